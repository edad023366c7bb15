use sanjaya_core::infer_topic;

#[test]
fn explicit_molecule_or_drug_mention_wins() {
    assert_eq!(infer_topic("Find repurposing options for drug metformin"), "Metformin");
    assert_eq!(infer_topic("MOLECULE sildenafil in Oncology please"), "Sildenafil");
}

#[test]
fn short_input_is_taken_whole() {
    assert_eq!(infer_topic("  aspirin  "), "Aspirin");
    assert_eq!(infer_topic("low-dose aspirin"), "Low-dose aspirin");
}

#[test]
fn longer_input_prefers_capitalized_word() {
    assert_eq!(infer_topic("what about Ibuprofen in oncology"), "Ibuprofen");
    // "Can" is too short to count.
    assert_eq!(infer_topic("Can Rapamycin extend lifespan"), "Rapamycin");
}

#[test]
fn longer_input_falls_back_to_first_word() {
    assert_eq!(infer_topic("tell me more please"), "Tell");
}

#[test]
fn punctuation_only_falls_back_to_raw_prefix() {
    assert_eq!(infer_topic("???"), "???");
    assert_eq!(infer_topic(""), "");
}
