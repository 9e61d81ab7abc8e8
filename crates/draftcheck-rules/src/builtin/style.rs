//! Wordiness and phrasing
//!
//! These rules are opinionated and noisy on technical prose, so none of them
//! is part of the recommended set.

use draftcheck_core::{
    Diagnostic, Event, EventKind, Interest, LintContext, RuleCategory, RuleMetadata, Severity,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{BuiltinRule, report_matches};

pub static WORDY_PHRASE: RuleMetadata = RuleMetadata {
    code: "035",
    name: "wordy-phrase",
    summary: "Redundant, unnecessary, overused or needlessly wordy. Consider rephrasing.",
    explanation: r"Redundant, unnecessary, overused or needlessly wordy. Consider rephrasing.

Bad:
    The fact that it failed is not important.

Good:
    Its failure does not matter.",
    category: RuleCategory::Style,
    severity: Severity::Warning,
    recommended: false,
    show_spaces: false,
};

pub static WEASEL_WORD: RuleMetadata = RuleMetadata {
    code: "036",
    name: "weasel-word",
    summary: "Weasel words should be avoided.",
    explanation: r"Weasel words should be avoided.

Vague intensifiers and quantifiers sound precise without saying anything
measurable.

Bad:
    The results were very good.

Good:
    The results were good.",
    category: RuleCategory::Style,
    severity: Severity::Warning,
    recommended: false,
    show_spaces: false,
};

pub static PASSIVE_VOICE: RuleMetadata = RuleMetadata {
    code: "037",
    name: "passive-voice",
    summary: "Passive voice should be avoided.",
    explanation: r"Passive voice should be avoided.

Bad:
    The experiment was performed twice.

Good:
    We performed the experiment twice.",
    category: RuleCategory::Style,
    severity: Severity::Warning,
    recommended: false,
    show_spaces: false,
};

pub static DOUBLE_NEGATIVE: RuleMetadata = RuleMetadata {
    code: "038",
    name: "double-negative",
    summary: "Avoid double negatives.",
    explanation: r"Avoid double negatives.

Bad:
    It is not unlikely to rain.

Good:
    It is likely to rain.",
    category: RuleCategory::Style,
    severity: Severity::Warning,
    recommended: false,
    show_spaces: false,
};

const WORDY_PHRASES: &[&str] = &[
    "as to whether",
    "the case that",
    "in many cases",
    "certainly",
    "is a (?:man|woman) who",
    "along (?:the same|these|this|the) lines?",
    "one of the most",
    "absolutely essential",
    "a large number of",
    "all intents and purposes",
    "not important",
    "the question as to whether",
    "there is no doubt but that",
    "this is a (?:subject|topic) which",
    "the fact that",
    "the authors?",
    "revert back",
    "repeat the same",
    "reason to believe",
    "join together",
    "is used to",
    "in regards to",
    "importantly",
    "as long as",
    "along (?:those|these) lines",
    "(?:a|the) tendency to",
    "(?:a|the) need for",
    "(?:a|the) majority of",
];

const WEASEL_WORDS: &[&str] = &[
    "many",
    "various",
    "very",
    "fairly",
    "several",
    "extremely",
    "exceedingly",
    "quite",
    "remarkably",
    "few",
    "surprisingly",
    "mostly",
    "largely",
    "huge",
    "tiny",
    "(?:are|is) a number",
    "excellent",
    "interestingly",
    "significantly",
    "substantially",
    "clearly",
    "vast",
    "relatively",
    "completely",
];

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "awoken", "been", "born", "beat", "become", "begun", "bent", "beset", "bet", "bid", "bidden",
    "bound", "bitten", "bled", "blown", "broken", "bred", "brought", "broadcast", "built",
    "burnt", "burst", "bought", "cast", "caught", "chosen", "clung", "come", "cost", "crept",
    "cut", "dealt", "dug", "dived", "done", "drawn", "dreamt", "driven", "drunk", "eaten",
    "fallen", "fed", "felt", "fought", "found", "fit", "fled", "flung", "flown", "forbidden",
    "forgotten", "foregone", "forgiven", "forsaken", "frozen", "gotten", "given", "gone",
    "ground", "grown", "hung", "heard", "hidden", "hit", "held", "hurt", "kept", "knelt", "knit",
    "known", "laid", "led", "leapt", "learnt", "left", "lent", "let", "lain", "lighted", "lost",
    "made", "meant", "met", "misspelt", "mistaken", "mown", "overcome", "overdone", "overtaken",
    "overthrown", "paid", "pled", "proven", "put", "quit", "read", "rid", "ridden", "rung",
    "risen", "run", "sawn", "said", "seen", "sought", "sold", "sent", "set", "sewn", "shaken",
    "shaven", "shorn", "shed", "shone", "shod", "shot", "shown", "shrunk", "shut", "sung",
    "sunk", "sat", "slept", "slain", "slid", "slung", "slit", "smitten", "sown", "spoken",
    "sped", "spent", "spilt", "spun", "spit", "split", "spread", "sprung", "stood", "stolen",
    "stuck", "stung", "stunk", "stridden", "struck", "strung", "striven", "sworn", "swept",
    "swollen", "swum", "swung", "taken", "taught", "torn", "told", "thought", "thrived",
    "thrown", "thrust", "trodden", "understood", "upheld", "upset", "woken", "worn", "woven",
    "wed", "wept", "wound", "won", "withheld", "withstood", "wrung", "written",
];

/// Case-insensitive whole-word alternation over `words`
fn word_alternation(words: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
}

static WORDY: Lazy<Regex> = Lazy::new(|| word_alternation(WORDY_PHRASES));

static WEASEL: Lazy<Regex> = Lazy::new(|| word_alternation(WEASEL_WORDS));

static PASSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:am|are|were|being|is|been|was|be)\s+(?:\w+ed|{})\b",
        IRREGULAR_PARTICIPLES.join("|")
    ))
    .unwrap()
});

static NOT_UN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnot\s+un\w+").unwrap());

pub fn rules() -> Vec<BuiltinRule> {
    let prose = Interest::none().with_prose();
    vec![
        BuiltinRule::new(&WORDY_PHRASE, prose, check_wordy_phrase),
        BuiltinRule::new(&WEASEL_WORD, prose, check_weasel_word),
        BuiltinRule::new(&PASSIVE_VOICE, prose, check_passive_voice),
        BuiltinRule::new(&DOUBLE_NEGATIVE, prose, check_double_negative),
    ]
}

pub fn check_wordy_phrase(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &WORDY_PHRASE, &WORDY)
}

pub fn check_weasel_word(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &WEASEL_WORD, &WEASEL)
}

pub fn check_passive_voice(ctx: &LintContext<'_>, events: &[Event<'_, '_>]) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &PASSIVE_VOICE, &PASSIVE)
}

pub fn check_double_negative(
    ctx: &LintContext<'_>,
    events: &[Event<'_, '_>],
) -> Vec<Diagnostic> {
    report_matches(ctx, events, EventKind::Prose, &DOUBLE_NEGATIVE, &NOT_UN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{excerpts, find};

    #[test]
    fn test_style_rules_are_not_recommended() {
        assert!(rules().iter().all(|rule| !rule.metadata.recommended));
        assert!(
            rules()
                .iter()
                .all(|rule| rule.metadata.category == RuleCategory::Style)
        );
    }

    #[test]
    fn test_wordy_phrases() {
        let r = find(rules(), &WORDY_PHRASE);
        assert_eq!(
            excerpts(&r, "The fact that, along these lines, The Authors"),
            vec!["The fact that", "along these lines", "The Authors"]
        );
        assert!(excerpts(&r, "Its failure does not matter.").is_empty());
    }

    #[test]
    fn test_weasel_words_match_whole_words() {
        let r = find(rules(), &WEASEL_WORD);
        assert_eq!(excerpts(&r, "Very good, and is a number"), vec!["Very", "is a number"]);
        assert!(excerpts(&r, "every manifold").is_empty());
    }

    #[test]
    fn test_passive_voice() {
        let r = find(rules(), &PASSIVE_VOICE);
        assert_eq!(
            excerpts(&r, "It was performed and is\nwritten"),
            vec!["was performed", "is\nwritten"]
        );
        assert!(excerpts(&r, "We performed it.").is_empty());
        assert!(excerpts(&r, "It is blue").is_empty());
    }

    #[test]
    fn test_double_negative() {
        let r = find(rules(), &DOUBLE_NEGATIVE);
        assert_eq!(excerpts(&r, "It is not unlikely"), vec!["not unlikely"]);
        assert!(excerpts(&r, "It is not likely, nor unusual").is_empty());
    }
}
