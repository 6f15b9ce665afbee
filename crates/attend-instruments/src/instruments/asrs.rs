use crate::scoring::{Domain, Item, ScoreRange, ScoreType, Subscale};
use crate::screener;
use crate::subscales::{max_score, HYPERACTIVITY, INATTENTION, PART_A, PART_B};
use crate::Instrument;

/// ASRS v1.1: Adult ADHD Self-Report Scale, symptom checklist.
/// 18 items rated 0 (Never) to 4 (Very Often). Part A (items 1-6) is the
/// screener; Part B (items 7-18) adds supplemental symptoms.
pub struct Asrs;

const ITEM_TEXTS: [&str; 18] = [
    "How often do you have trouble wrapping up the final details of a project, once the challenging parts have been done?",
    "How often do you have difficulty getting things in order when you have to do a task that requires organization?",
    "How often do you have problems remembering appointments or obligations?",
    "When you have a task that requires a lot of thought, how often do you avoid or delay getting started?",
    "How often do you fidget or squirm with your hands or feet when you have to sit down for a long time?",
    "How often do you feel overly active and compelled to do things, like you were driven by a motor?",
    "How often do you make careless mistakes when you have to work on a boring or difficult project?",
    "How often do you have difficulty keeping your attention when you are doing boring or repetitive work?",
    "How often do you have difficulty concentrating on what people say to you, even when they are speaking to you directly?",
    "How often do you misplace or have difficulty finding things at home or at work?",
    "How often are you distracted by activity or noise around you?",
    "How often do you leave your seat in meetings or other situations in which you are expected to remain seated?",
    "How often do you feel restless or fidgety?",
    "How often do you have difficulty unwinding and relaxing when you have time to yourself?",
    "How often do you find yourself talking too much when you are in social situations?",
    "When you're in a conversation, how often do you find yourself finishing the sentences of the people you are talking to, before they can finish them themselves?",
    "How often do you have difficulty waiting your turn in situations when turn taking is required?",
    "How often do you interrupt others when they are busy?",
];

impl Instrument for Asrs {
    fn id(&self) -> &str {
        "asrs_v1_1"
    }

    fn name(&self) -> &str {
        "ASRS v1.1"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            let total_items: Vec<u8> = (1..=18).collect();

            vec![
                Domain {
                    id: "parts".to_string(),
                    name: "Checklist Parts".to_string(),
                    subscales: vec![
                        subscale("part_a", "Part A (screener)", &PART_A),
                        subscale("part_b", "Part B", &PART_B),
                        subscale("total", "Total", &total_items),
                    ],
                    composite_score_type: Some(ScoreType::Raw),
                    composite_range: Some(ScoreRange::integer(0, max_score(&total_items))),
                    description: Some("Part A + Part B = Total".to_string()),
                },
                Domain {
                    id: "dimensions".to_string(),
                    name: "Symptom Dimensions".to_string(),
                    subscales: vec![
                        subscale("inattention", "Inattention", &INATTENTION),
                        subscale("hyperactivity", "Hyperactivity/Impulsivity", &HYPERACTIVITY),
                    ],
                    composite_score_type: None,
                    composite_range: None,
                    description: Some(
                        "Groupings overlap Part A and Part B; they do not partition the items"
                            .to_string(),
                    ),
                },
                Domain {
                    id: "screener".to_string(),
                    name: "Shaded-Box Screener".to_string(),
                    subscales: vec![
                        Subscale {
                            id: "part_a_positive_items".to_string(),
                            name: "Part A shaded answers".to_string(),
                            score_type: ScoreType::Count,
                            range: ScoreRange::integer(0, PART_A.len() as u32),
                            items: PART_A.to_vec(),
                            description: Some("4 or more: screen positive".to_string()),
                        },
                        Subscale {
                            id: "part_b_positive_items".to_string(),
                            name: "Part B shaded answers".to_string(),
                            score_type: ScoreType::Count,
                            range: ScoreRange::integer(0, PART_B.len() as u32),
                            items: PART_B.to_vec(),
                            description: None,
                        },
                    ],
                    composite_score_type: None,
                    composite_range: None,
                    description: None,
                },
            ]
        });
        &DOMAINS
    }

    fn items(&self) -> &[Item] {
        static ITEMS: std::sync::LazyLock<Vec<Item>> = std::sync::LazyLock::new(|| {
            ITEM_TEXTS
                .iter()
                .zip(1u8..)
                .map(|(text, id)| Item {
                    id,
                    text: text.to_string(),
                    screener_threshold: screener::threshold(id).value(),
                })
                .collect()
        });
        &ITEMS
    }
}

fn subscale(id: &str, name: &str, items: &[u8]) -> Subscale {
    Subscale {
        id: id.to_string(),
        name: name.to_string(),
        score_type: ScoreType::Raw,
        range: ScoreRange::integer(0, max_score(items)),
        items: items.to_vec(),
        description: None,
    }
}
