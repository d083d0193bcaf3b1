//! English disease table compiled into the binary.

use super::store::{DiseaseRecord, DiseaseTable};

fn record(cause: &[&str], precaution: &[&str], cure: &[&str]) -> DiseaseRecord {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
    DiseaseRecord {
        cause: owned(cause),
        precaution: owned(precaution),
        cure: owned(cure),
    }
}

/// Cause, precaution and cure notes for the diseased classes of the default
/// model. Healthy classes have no entry.
pub fn builtin_english_table() -> DiseaseTable {
    let mut table = DiseaseTable::new();

    table.insert(
        "Pepper__bell___Bacterial_spot".to_string(),
        record(
            &[
                "Xanthomonas bacteria",
                "Warm, humid climate (25-30°C)",
                "Infected seeds or soil",
            ],
            &[
                "Use resistant varieties like Antebellum, Green Machine",
                "Proper spacing, drip irrigation",
                "Sanitation, crop rotation",
            ],
            &[
                "Copper-based bactericides",
                "Copper + mancozeb, streptocycline alone or with Blitox 50",
                "Destroy infected plants",
            ],
        ),
    );

    table.insert(
        "Potato___Early_blight".to_string(),
        record(
            &[
                "Alternaria solani fungus",
                "Warm, alternating wet/dry (up to 30°C)",
                "Infected debris or soil",
            ],
            &[
                "Use Kufri Pukhraj resistant variety",
                "Crop rotation, balanced nutrition",
                "Proper spacing, drip irrigation",
            ],
            &[
                "Fenamidone 10% + mancozeb 50% WDG",
                "Metiram 55% + pyraclostrobin 5% WDG",
                "Destroy infected material",
            ],
        ),
    );

    table.insert(
        "Tomato_Bacterial_spot".to_string(),
        record(
            &[
                "Xanthomonas species",
                "Warm, humid climate (24-30°C)",
                "Infected seeds, tools",
            ],
            &[
                "Disease-free seeds, resistant varieties",
                "Crop rotation, spacing",
                "Avoid overhead irrigation and handling wet plants. Can use hot water treatment of seeds at 50°C for 25 minutes",
            ],
            &[
                "Copper-based bactericides",
                "Vermicompost seed treatment",
                "Copper + mancozeb, acibenzolar-S-methyl (ASM)",
            ],
        ),
    );

    table.insert(
        "Tomato_Early_blight".to_string(),
        record(
            &[
                "Alternaria solani fungus",
                "Warm, wet/dry cycle",
                "Infected debris, soil",
            ],
            &[
                "Use Indus 1030, Bangalore Red resistant varieties",
                "Crop rotation, spacing",
                "Maintain nitrogen levels",
            ],
            &[
                "Chlorothalonil, mancozeb",
                "Systemic + contact fungicides",
                "Destroy infected plants",
            ],
        ),
    );

    table
}
