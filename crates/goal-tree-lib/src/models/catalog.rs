//! Built-in rule sets.

use super::rule::{Rule, RuleSet};

/// Look up a built-in rule set by name
pub fn by_name(name: &str) -> Option<RuleSet> {
    match name.to_lowercase().as_str() {
        "zookeeper" | "zoo" => Some(zookeeper()),
        "tourist" | "luna" => Some(tourist()),
        _ => None,
    }
}

/// Names accepted by [`by_name`]
pub const BUILTIN_NAMES: &[&str] = &["zookeeper", "tourist"];

/// Animal identification rules Z1-Z15
pub fn zookeeper() -> RuleSet {
    let rules = vec![
        Rule::new(&["(?x) has hair"], "(?x) is a mammal"),
        Rule::new(&["(?x) gives milk"], "(?x) is a mammal"),
        Rule::new(&["(?x) has feathers"], "(?x) is a bird"),
        Rule::new(&["(?x) flies", "(?x) lays eggs"], "(?x) is a bird"),
        Rule::new(&["(?x) is a mammal", "(?x) eats meat"], "(?x) is a carnivore"),
        Rule::new(
            &[
                "(?x) is a mammal",
                "(?x) has pointed teeth",
                "(?x) has claws",
                "(?x) has forward-pointing eyes",
            ],
            "(?x) is a carnivore",
        ),
        Rule::new(&["(?x) is a mammal", "(?x) has hoofs"], "(?x) is an ungulate"),
        Rule::new(&["(?x) is a mammal", "(?x) chews cud"], "(?x) is an ungulate"),
        Rule::new(
            &["(?x) is a carnivore", "(?x) has tawny color", "(?x) has dark spots"],
            "(?x) is a cheetah",
        ),
        Rule::new(
            &["(?x) is a carnivore", "(?x) has tawny color", "(?x) has black stripes"],
            "(?x) is a tiger",
        ),
        Rule::new(
            &[
                "(?x) is an ungulate",
                "(?x) has long legs",
                "(?x) has long neck",
                "(?x) has tawny color",
                "(?x) has dark spots",
            ],
            "(?x) is a giraffe",
        ),
        Rule::new(
            &["(?x) is an ungulate", "(?x) has white color", "(?x) has black stripes"],
            "(?x) is a zebra",
        ),
        Rule::new(
            &[
                "(?x) is a bird",
                "(?x) does not fly",
                "(?x) has long legs",
                "(?x) has long neck",
                "(?x) has black and white color",
            ],
            "(?x) is an ostrich",
        ),
        Rule::new(
            &[
                "(?x) is a bird",
                "(?x) does not fly",
                "(?x) swims",
                "(?x) has black and white color",
            ],
            "(?x) is a penguin",
        ),
        Rule::new(&["(?x) is a bird", "(?x) is a good flyer"], "(?x) is an albatross"),
    ];

    RuleSet {
        name: "zookeeper".to_string(),
        rules,
        exclusive_groups: Vec::new(),
    }
}

/// Luna-City rules: Earth tourists of various kinds versus Loonies (locals)
pub fn tourist() -> RuleSet {
    let rules = vec![
        // General observations
        Rule::new(&["(?x) wears clothing that stands out"], "(?x) is noticeable"),
        Rule::new(&["(?x) walks slowly"], "(?x) moves cautiously"),
        Rule::new(&["(?x) frequently checks a device"], "(?x) is dependent on technology"),
        Rule::new(&["(?x) takes frequent photos"], "(?x) likes to document experiences"),
        Rule::new(&["(?x) asks about Luna-City history"], "(?x) is interested in lunar knowledge"),
        Rule::new(
            &["(?x) shows excitement when visiting landmarks"],
            "(?x) is enthusiastic about Luna-City",
        ),
        // Tourist or local, by context
        Rule::new(&["(?x) is noticeable", "(?x) wears bright flashy clothing"], "(?x) is a tourist"),
        Rule::new(
            &["(?x) is noticeable", "(?x) wears muted, utilitarian clothing"],
            "(?x) is a Loonie",
        ),
        Rule::new(&["(?x) moves cautiously", "(?x) takes photos while walking"], "(?x) is a tourist"),
        Rule::new(
            &["(?x) moves cautiously", "(?x) avoids hazards in lunar gravity"],
            "(?x) is a Loonie",
        ),
        Rule::new(
            &["(?x) is dependent on technology", "(?x) frequently checks for directions"],
            "(?x) is a tourist",
        ),
        Rule::new(
            &["(?x) is dependent on technology", "(?x) uses tech to navigate efficiently"],
            "(?x) is a Loonie",
        ),
        Rule::new(
            &["(?x) likes to document experiences", "(?x) takes selfies at landmarks"],
            "(?x) is a tourist",
        ),
        Rule::new(
            &["(?x) likes to document experiences", "(?x) takes notes for academic purposes"],
            "(?x) is an academic tourist",
        ),
        Rule::new(
            &["(?x) is interested in lunar knowledge", "(?x) asks basic questions about lunar history"],
            "(?x) is a tourist",
        ),
        Rule::new(
            &["(?x) is interested in lunar knowledge", "(?x) asks in-depth technical questions"],
            "(?x) is a Loonie",
        ),
        Rule::new(
            &["(?x) is enthusiastic about Luna-City", "(?x) expresses nostalgia for Earth"],
            "(?x) is an Earth retiree tourist",
        ),
        Rule::new(
            &["(?x) is enthusiastic about Luna-City", "(?x) discusses Luna-City innovations"],
            "(?x) is a Loonie",
        ),
        // Kinds of tourist
        Rule::new(
            &["(?x) is a tourist", "(?x) wears business attire", "(?x) asks about corporate policies"],
            "(?x) is an Earth business traveler",
        ),
        Rule::new(
            &[
                "(?x) is a tourist",
                "(?x) wears adventure-themed clothing",
                "(?x) asks about lunar landmarks",
            ],
            "(?x) is an Earth explorer",
        ),
        Rule::new(
            &[
                "(?x) is a tourist",
                "(?x) talks about lunar research",
                "(?x) takes notes for academic purposes",
            ],
            "(?x) is an Earth academic",
        ),
        Rule::new(
            &["(?x) is a tourist", "(?x) wears stylish outfits", "(?x) records videos constantly"],
            "(?x) is an Earth influencer",
        ),
        Rule::new(
            &[
                "(?x) is a tourist",
                "(?x) moves slowly in lunar gravity",
                "(?x) talks nostalgically about Earth",
            ],
            "(?x) is an Earth retiree",
        ),
    ];

    let exclusive_groups: Vec<Vec<String>> = [
        ["wears bright flashy clothing", "wears muted, utilitarian clothing"],
        ["frequently checks for directions", "uses tech to navigate efficiently"],
        ["asks basic questions about lunar history", "asks in-depth technical questions"],
        ["wears business attire", "wears adventure-themed clothing"],
        ["records videos constantly", "talks nostalgically about Earth"],
    ]
    .iter()
    .map(|group| group.iter().map(|s| s.to_string()).collect())
    .collect();

    RuleSet {
        name: "tourist".to_string(),
        rules,
        exclusive_groups,
    }
}
