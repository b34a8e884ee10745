use crate::content::SafetyFlag;

pub const SELF_HARM_KEYWORDS: [&str; 9] = [
    "убить себя",
    "покончить",
    "суицид",
    "не хочу жить",
    "лучше бы меня не было",
    "хочу умереть",
    "конец всему",
    "нет смысла жить",
    "порезать себя",
];

pub const CRISIS_KEYWORDS: [&str; 7] = [
    "не могу дышать",
    "паническая атака",
    "схожу с ума",
    "не выдержу",
    "всё рушится",
    "не могу функционировать",
    "полный распад",
];

pub const SUBSTANCE_KEYWORDS: [&str; 8] = [
    "напился",
    "нажрался",
    "употребил",
    "срыв",
    "опять пью",
    "не могу остановиться",
    "наркотики",
    "закинулся",
];

const CATEGORIES: [(SafetyFlag, &[&str]); 3] = [
    (SafetyFlag::SelfHarmRisk, &SELF_HARM_KEYWORDS),
    (SafetyFlag::CrisisDetected, &CRISIS_KEYWORDS),
    (SafetyFlag::SubstanceMention, &SUBSTANCE_KEYWORDS),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    pub flag: SafetyFlag,
    pub keyword: &'static str,
}

/// Result of the local pre-filter: at most one match per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordScan {
    pub matches: Vec<KeywordMatch>,
}

impl KeywordScan {
    pub fn is_clear(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn flags(&self) -> Vec<SafetyFlag> {
        self.matches.iter().map(|m| m.flag).collect()
    }
}

// Users type "е" for "ё" as often as not.
fn fold(text: &str) -> String {
    text.to_lowercase().replace('ё', "е")
}

/// Case-insensitive substring scan over all three lists. No I/O.
pub fn scan(text: &str) -> KeywordScan {
    let haystack = fold(text);
    let matches = CATEGORIES
        .iter()
        .filter_map(|(flag, keywords)| {
            keywords
                .iter()
                .find(|keyword| haystack.contains(&fold(keyword)))
                .map(|keyword| KeywordMatch {
                    flag: *flag,
                    keyword: *keyword,
                })
        })
        .collect();
    KeywordScan { matches }
}
