//! Offline spelling boundary used by the `spell` rule.
//!
//! The check is dictionary driven: a table of common misspellings shared by
//! every locale, plus a regional table that rewrites the other locale's
//! spellings (US flags `colour`, UK flags `color`).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locale {
    Us,
    Uk,
}

impl Locale {
    /// `UK`/`GB` (any case) select British spelling; everything else is US.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UK" | "GB" | "EN-GB" | "EN_GB" => Locale::Uk,
            _ => Locale::Us,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Us => "US",
            Locale::Uk => "UK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Misspelling {
    pub word: String,
    pub suggestion: String,
    /// Byte offset of the word in the checked text.
    pub offset: usize,
}

const COMMON: &[(&str, &str)] = &[
    ("accomodate", "accommodate"),
    ("acheive", "achieve"),
    ("adress", "address"),
    ("agressive", "aggressive"),
    ("alot", "a lot"),
    ("apparantly", "apparently"),
    ("argumnet", "argument"),
    ("arguement", "argument"),
    ("asynchonous", "asynchronous"),
    ("becuase", "because"),
    ("begining", "beginning"),
    ("beleive", "believe"),
    ("calender", "calendar"),
    ("comitted", "committed"),
    ("commited", "committed"),
    ("compatability", "compatibility"),
    ("concurent", "concurrent"),
    ("definately", "definitely"),
    ("dependancy", "dependency"),
    ("dependant", "dependent"),
    ("existant", "existent"),
    ("enviroment", "environment"),
    ("occured", "occurred"),
    ("occurence", "occurrence"),
    ("paramter", "parameter"),
    ("paramters", "parameters"),
    ("persistant", "persistent"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("refered", "referred"),
    ("seperate", "separate"),
    ("succesful", "successful"),
    ("successfull", "successful"),
    ("teh", "the"),
    ("threshhold", "threshold"),
    ("untill", "until"),
    ("wich", "which"),
    ("writting", "writing"),
];

/// British spellings flagged under the US locale.
const UK_TO_US: &[(&str, &str)] = &[
    ("analyse", "analyze"),
    ("behaviour", "behavior"),
    ("cancelled", "canceled"),
    ("catalogue", "catalog"),
    ("centre", "center"),
    ("colour", "color"),
    ("defence", "defense"),
    ("favour", "favor"),
    ("flavour", "flavor"),
    ("honour", "honor"),
    ("initialise", "initialize"),
    ("labelled", "labeled"),
    ("licence", "license"),
    ("modelling", "modeling"),
    ("normalise", "normalize"),
    ("optimise", "optimize"),
    ("organisation", "organization"),
    ("organise", "organize"),
    ("recognise", "recognize"),
    ("serialise", "serialize"),
    ("travelled", "traveled"),
    ("utilise", "utilize"),
];

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(w, _)| *w == key).map(|(_, s)| *s)
}

fn regional(word: &str, locale: Locale) -> Option<&'static str> {
    match locale {
        Locale::Us => lookup(UK_TO_US, word),
        Locale::Uk => UK_TO_US
            .iter()
            .find(|(_, us)| *us == word)
            .map(|(uk, _)| *uk),
    }
}

fn match_case(original: &str, suggestion: &str) -> String {
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut s = suggestion.chars();
            match s.next() {
                Some(c) => c.to_uppercase().chain(s).collect(),
                None => String::new(),
            }
        }
        _ => suggestion.to_string(),
    }
}

fn words(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        let part_of_word = c.is_alphabetic() || (c == '\'' && start.is_some());
        match (part_of_word, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out.into_iter()
        .map(|(i, w)| (i, w.trim_end_matches('\'')))
        .collect()
}

/// Checks every word of `text` and returns findings in text order.
pub fn check(text: &str, locale: Locale) -> Vec<Misspelling> {
    words(text)
        .into_iter()
        .filter_map(|(offset, word)| {
            let key = word.to_lowercase();
            let suggestion = lookup(COMMON, &key).or_else(|| regional(&key, locale))?;
            Some(Misspelling {
                word: word.to_string(),
                suggestion: match_case(word, suggestion),
                offset,
            })
        })
        .collect()
}
