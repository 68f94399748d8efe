use crate::core::PillRecord;

/// Common imprints the local store starts with
pub fn seed_pills() -> Vec<PillRecord> {
    vec![
        PillRecord::new("L484", "Acetaminophen")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("500 mg")
            .with_class("Miscellaneous analgesics", "Pain, Fever"),
        PillRecord::new("M367", "Acetaminophen and Hydrocodone Bitartrate")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("325 mg / 10 mg")
            .with_class("Narcotic analgesic combinations", "Pain"),
        PillRecord::new("L612", "Acetaminophen")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("500 mg")
            .with_class("Miscellaneous analgesics", "Pain, Fever"),
        PillRecord::new("IP 109", "Acetaminophen and Hydrocodone Bitartrate")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("325 mg / 5 mg")
            .with_class("Narcotic analgesic combinations", "Pain"),
        PillRecord::new("AN 627", "Tramadol Hydrochloride")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("50 mg")
            .with_class("Narcotic analgesics", "Pain"),
        PillRecord::new("IBU 800", "Ibuprofen")
            .with_appearance("White", "Capsule/Oblong")
            .with_strength("800 mg")
            .with_class("Nonsteroidal anti-inflammatory drugs", "Pain, Inflammatory Conditions"),
        PillRecord::new("M 30", "Oxycodone Hydrochloride")
            .with_appearance("Blue", "Round")
            .with_strength("30 mg")
            .with_class("Opioids (narcotic analgesics)", "Pain"),
        PillRecord::new("G 3722", "Alprazolam")
            .with_appearance("White", "Rectangle")
            .with_strength("2 mg")
            .with_class("Benzodiazepines", "Anxiety, Panic Disorder"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_records_are_complete() {
        let pills = seed_pills();
        assert!(!pills.is_empty());

        let imprints: HashSet<String> = pills.iter().map(|p| p.normalized_imprint()).collect();
        assert_eq!(imprints.len(), pills.len());

        for pill in &pills {
            assert!(!pill.normalized_imprint().is_empty());
            assert_ne!(pill.strength, crate::core::UNKNOWN);
        }
    }
}
