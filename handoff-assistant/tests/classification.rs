use handoff_assistant::{classify, PersonalField, Topic};

#[test]
fn keyword_collisions_resolve_by_rule_order() {
    let cases = [
        ("thanks, bye", Topic::EndConversation),
        ("Thank you, what about the pain meds?", Topic::EndConversation),
        ("temperature and aspirin medication", Topic::Vitals),
        ("monitor pain overnight", Topic::Vitals),
        ("medication for pain", Topic::Medication),
        ("pain before discharge", Topic::Pain),
        ("care plan before discharge", Topic::CarePriorities),
        ("discharge safety", Topic::Discharge),
        ("allergy check", Topic::Allergy),
        ("check the name band", Topic::Assessment),
        ("name and age", Topic::PersonalLookup(PersonalField::Name)),
        ("random words", Topic::Fallback),
    ];

    for (message, expected) in cases {
        assert_eq!(classify(message), expected, "message: {message}");
    }
}

#[test]
fn care_priority_synonyms_and_entity_words() {
    assert_eq!(classify("Any concerns tonight?"), Topic::CarePriorities);
    assert_eq!(classify("What is most important?"), Topic::CarePriorities);
    assert_eq!(classify("What's his pulse?"), Topic::Fallback);
    assert_eq!(classify("Any reaction to the contrast?"), Topic::Fallback);
}

#[test]
fn bp_is_a_whole_word() {
    assert_eq!(classify("BP trend since noon"), Topic::Vitals);
    assert_eq!(classify("what is the bpm"), Topic::Fallback);
}

#[test]
fn end_phrases_are_whole_words() {
    assert_eq!(classify("end of shift"), Topic::EndConversation);
    assert_eq!(classify("Please CLOSE"), Topic::EndConversation);
    assert_ne!(classify("trending pressures"), Topic::EndConversation);
}

#[test]
fn personal_lookups_keep_field_order() {
    let cases = [
        ("What gender?", PersonalField::Gender),
        ("What is the age?", PersonalField::Age),
        ("Marital status?", PersonalField::MaritalStatus),
        ("Which room?", PersonalField::Room),
        ("Primary diagnosis?", PersonalField::Diagnosis),
        ("What's her risk?", PersonalField::RiskLevel),
        ("Acuity?", PersonalField::Acuity),
        ("Name and room", PersonalField::Name),
    ];

    for (message, field) in cases {
        assert_eq!(classify(message), Topic::PersonalLookup(field), "message: {message}");
    }
}

#[test]
fn topics_serialize_with_field_tag() {
    let value = serde_json::to_value(Topic::PersonalLookup(PersonalField::MaritalStatus)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "topic": "personal_lookup", "field": "marital_status" })
    );
    let value = serde_json::to_value(Topic::Pain).unwrap();
    assert_eq!(value, serde_json::json!({ "topic": "pain" }));
}
