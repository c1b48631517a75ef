//! Built-in linguistic model: a closed-class lexicon, an irregular-lemma table, the Snowball
//! English stemmer and a small résumé-domain thesaurus.
//!
//! The model is built at most once per process through [`LinguisticModel::shared`] and is
//! read-only afterwards. Components that need it receive the `Arc` explicitly.

use once_cell::sync::OnceCell;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

/// Coarse part-of-speech classes. Only nouns, verbs and adjectives count as content terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Numeral,
    Function,
}

impl PartOfSpeech {
    pub fn is_content(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::Verb | PartOfSpeech::Adjective
        )
    }
}

/// A tagged token: its class plus the lemma the extractor should keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub pos: PartOfSpeech,
    pub lemma: String,
}

const VERB_SUFFIXES: &[&str] = &["ing", "ed"];
const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ment", "ity", "ness", "ship", "ance", "ence"];
const ADJECTIVE_SUFFIXES: &[&str] = &["ive", "ous", "ful", "able", "ible", "less"];

fn has_suffix(token: &str, suffixes: &[&str]) -> bool {
    // Require a stem of at least two characters, otherwise "red" reads as a verb.
    suffixes
        .iter()
        .any(|s| token.len() >= s.len() + 2 && token.ends_with(s))
}

/// Suffix-only classification. Anything without a recognised suffix is noun-like.
pub fn heuristic_pos(token: &str) -> PartOfSpeech {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        PartOfSpeech::Numeral
    } else if has_suffix(token, VERB_SUFFIXES) {
        PartOfSpeech::Verb
    } else if has_suffix(token, NOUN_SUFFIXES) {
        PartOfSpeech::Noun
    } else if has_suffix(token, ADJECTIVE_SUFFIXES) {
        PartOfSpeech::Adjective
    } else if has_suffix(token, &["ly"]) {
        PartOfSpeech::Adverb
    } else {
        PartOfSpeech::Noun
    }
}

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "our", "your", "their", "his",
    "her", "its", "i", "we", "you", "he", "she", "they", "it", "me", "us", "them", "and", "or",
    "but", "nor", "so", "yet", "if", "because", "while", "although", "of", "in", "on", "at",
    "to", "for", "with", "by", "from", "into", "onto", "over", "under", "about", "across",
    "through", "between", "among", "within", "without", "via", "per", "is", "am", "are", "was",
    "were", "be", "been", "being", "do", "does", "did", "doing", "have", "has", "had", "having",
    "will", "would", "shall", "should", "can", "could", "may", "might", "must", "who", "whom",
    "whose", "which", "what", "where", "when", "why", "how",
];

const ADVERBS: &[&str] = &[
    "also", "very", "well", "often", "always", "never", "just", "really", "quite", "too",
    "again", "already", "soon", "still", "here", "there", "now", "then",
];

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("led", "lead"),
    ("built", "build"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("taught", "teach"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("began", "begin"),
    ("begun", "begin"),
    ("made", "make"),
    ("won", "win"),
    ("sold", "sell"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("thought", "think"),
    ("held", "hold"),
    ("met", "meet"),
    ("kept", "keep"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("undertook", "undertake"),
    ("took", "take"),
    ("gave", "give"),
    ("chose", "choose"),
    ("people", "person"),
    ("children", "child"),
];

const THESAURUS: &[&[&str]] = &[
    &["lead", "manage", "direct", "supervise", "oversee", "head", "guide"],
    &["develop", "build", "create", "engineer", "implement", "construct"],
    &["design", "architect", "plan"],
    &["analyze", "analyse", "evaluate", "assess", "examine", "investigate"],
    &["improve", "enhance", "optimize", "boost", "streamline"],
    &["collaborate", "cooperate", "partner"],
    &["communicate", "present", "convey", "articulate"],
    &["customer", "client"],
    &["team", "group", "squad"],
    &["skill", "ability", "competency", "proficiency"],
    &["experience", "background", "expertise"],
    &["goal", "objective", "target"],
    &["budget", "funding", "finances"],
    &["launch", "ship", "deliver", "release"],
    &["mentor", "coach", "train", "teach"],
    &["reduce", "decrease", "cut", "lower"],
    &["increase", "grow", "raise", "expand"],
    &["resolve", "solve", "fix", "troubleshoot"],
];

static SHARED_MODEL: OnceCell<Arc<LinguisticModel>> = OnceCell::new();

pub struct LinguisticModel {
    function_words: HashSet<&'static str>,
    adverbs: HashSet<&'static str>,
    irregular_lemmas: HashMap<&'static str, &'static str>,
    stemmer: Stemmer,
    /// lemma → indices into `THESAURUS`
    thesaurus_index: HashMap<String, Vec<usize>>,
}

impl LinguisticModel {
    /// Returns the process-wide model, building it on first use.
    pub fn shared() -> Arc<LinguisticModel> {
        SHARED_MODEL
            .get_or_init(|| {
                let model = LinguisticModel::load();
                info!(
                    "Linguistic model initialized ({} thesaurus lemmas)",
                    model.thesaurus_index.len()
                );
                Arc::new(model)
            })
            .clone()
    }

    pub fn load() -> Self {
        let mut model = Self {
            function_words: FUNCTION_WORDS.iter().copied().collect(),
            adverbs: ADVERBS.iter().copied().collect(),
            irregular_lemmas: IRREGULAR_LEMMAS.iter().copied().collect(),
            stemmer: Stemmer::create(Algorithm::English),
            thesaurus_index: HashMap::new(),
        };

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (group_idx, group) in THESAURUS.iter().enumerate() {
            for word in group.iter() {
                let groups = index.entry(model.lemma(word)).or_default();
                if !groups.contains(&group_idx) {
                    groups.push(group_idx);
                }
            }
        }
        model.thesaurus_index = index;
        model
    }

    /// Dictionary lemma for irregular forms, Snowball stem otherwise.
    pub fn lemma(&self, token: &str) -> String {
        match self.irregular_lemmas.get(token) {
            Some(lemma) => lemma.to_string(),
            None => self.stemmer.stem(token).into_owned(),
        }
    }

    pub fn tag(&self, token: &str) -> TaggedToken {
        let pos = if self.function_words.contains(token) {
            PartOfSpeech::Function
        } else if self.adverbs.contains(token) {
            PartOfSpeech::Adverb
        } else if self.irregular_lemmas.contains_key(token) {
            // Every irregular entry except the plural nouns is a verb form.
            match token {
                "people" | "children" => PartOfSpeech::Noun,
                _ => PartOfSpeech::Verb,
            }
        } else {
            heuristic_pos(token)
        };

        TaggedToken {
            pos,
            lemma: self.lemma(token),
        }
    }

    /// Thesaurus entries sharing a group with `word`, excluding `word` itself.
    pub fn synonyms(&self, word: &str) -> BTreeSet<String> {
        let Some(groups) = self.thesaurus_index.get(&self.lemma(word)) else {
            return BTreeSet::new();
        };

        groups
            .iter()
            .flat_map(|&idx| THESAURUS[idx].iter())
            .filter(|candidate| **candidate != word)
            .map(|candidate| candidate.to_string())
            .collect()
    }
}
