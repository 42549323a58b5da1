//! Rule and lexicon based English tagger
//!
//! Produces part-of-speech tags, lemmas, gazetteer entities and noun chunks
//! without any statistical model. The lexicon ships embedded in the binary and
//! can be replaced by a TOML file with the same layout.
//!
//! The process-wide instance is created explicitly through [`initialize`] and
//! read back with [`shared`]; nothing is loaded implicitly.

use crate::error::{Result, SmartAtsError};
use crate::processing::stopwords;
use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use unicode_segmentation::UnicodeSegmentation;

const EMBEDDED_LEXICON: &str = include_str!("../../resources/lexicon.toml");

static SHARED_TAGGER: OnceLock<Arc<Tagger>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Verb,
    Adj,
    Adv,
    Det,
    Pron,
    Adp,
    Conj,
    Aux,
    Part,
    Num,
    Punct,
}

impl PartOfSpeech {
    fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }

    fn is_chunk_modifier(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Adj | PartOfSpeech::Num
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    Org,
    Product,
    WorkOfArt,
    Law,
}

impl EntityLabel {
    fn parse(label: &str) -> Option<Self> {
        match label {
            "ORG" => Some(EntityLabel::Org),
            "PRODUCT" => Some(EntityLabel::Product),
            "WORK_OF_ART" => Some(EntityLabel::WorkOfArt),
            "LAW" => Some(EntityLabel::Law),
            _ => None,
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityLabel::Org => "ORG",
            EntityLabel::Product => "PRODUCT",
            EntityLabel::WorkOfArt => "WORK_OF_ART",
            EntityLabel::Law => "LAW",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    pub is_alpha: bool,
    pub is_punct: bool,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Output of [`Tagger::tag`].
#[derive(Debug, Clone, Default)]
pub struct TaggedDoc {
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
    pub noun_chunks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Lexicon {
    closed_class: ClosedClass,
    open_class: OpenClass,
    #[serde(default)]
    lemmas: HashMap<String, String>,
    #[serde(default)]
    exceptions: Exceptions,
    #[serde(default)]
    entities: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ClosedClass {
    determiners: Vec<String>,
    pronouns: Vec<String>,
    prepositions: Vec<String>,
    conjunctions: Vec<String>,
    auxiliaries: Vec<String>,
    particles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenClass {
    verbs: Vec<String>,
    adjectives: Vec<String>,
    adverbs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Exceptions {
    words: Vec<String>,
}

pub struct Tagger {
    closed_class: HashMap<String, PartOfSpeech>,
    open_class: HashMap<String, PartOfSpeech>,
    lemmas: HashMap<String, String>,
    exceptions: HashSet<String>,
    gazetteer: HashMap<Vec<String>, EntityLabel>,
    max_entity_tokens: usize,
    stop_words: HashSet<&'static str>,
}

impl Tagger {
    /// Build a tagger from the lexicon compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_LEXICON)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))
            .map_err(|e| SmartAtsError::LinguisticResource(format!("{:#}", e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let lexicon: Lexicon = toml::from_str(content).map_err(|e| {
            SmartAtsError::LinguisticResource(format!("Invalid lexicon: {}", e))
        })?;

        let mut closed_class = HashMap::new();
        // Earlier classes win for words listed twice ("that" stays a determiner).
        let closed = [
            (&lexicon.closed_class.auxiliaries, PartOfSpeech::Aux),
            (&lexicon.closed_class.determiners, PartOfSpeech::Det),
            (&lexicon.closed_class.pronouns, PartOfSpeech::Pron),
            (&lexicon.closed_class.particles, PartOfSpeech::Part),
            (&lexicon.closed_class.prepositions, PartOfSpeech::Adp),
            (&lexicon.closed_class.conjunctions, PartOfSpeech::Conj),
        ];
        for (words, pos) in closed {
            for word in words {
                closed_class.entry(word.to_lowercase()).or_insert(pos);
            }
        }

        let mut open_class = HashMap::new();
        let open = [
            (&lexicon.open_class.adverbs, PartOfSpeech::Adv),
            (&lexicon.open_class.adjectives, PartOfSpeech::Adj),
            (&lexicon.open_class.verbs, PartOfSpeech::Verb),
        ];
        for (words, pos) in open {
            for word in words {
                open_class.entry(word.to_lowercase()).or_insert(pos);
            }
        }

        let mut gazetteer = HashMap::new();
        let mut max_entity_tokens = 0;
        for (label, names) in &lexicon.entities {
            let label = EntityLabel::parse(label).ok_or_else(|| {
                SmartAtsError::LinguisticResource(format!("Unknown entity label '{}'", label))
            })?;
            for name in names {
                let key = Self::entity_key(name);
                if key.is_empty() {
                    continue;
                }
                max_entity_tokens = max_entity_tokens.max(key.len());
                gazetteer.insert(key, label);
            }
        }

        let tagger = Self {
            closed_class,
            open_class,
            lemmas: lexicon
                .lemmas
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect(),
            exceptions: lexicon
                .exceptions
                .words
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            gazetteer,
            max_entity_tokens,
            stop_words: stopwords::english(),
        };

        debug!(
            "Tagger lexicon loaded: {} closed-class, {} open-class, {} entities",
            tagger.closed_class.len(),
            tagger.open_class.len(),
            tagger.gazetteer.len()
        );
        Ok(tagger)
    }

    /// Tag `text`, sentence by sentence.
    pub fn tag(&self, text: &str) -> TaggedDoc {
        let mut doc = TaggedDoc::default();

        for (offset, sentence) in text.split_sentence_bound_indices() {
            let first = doc.tokens.len();
            self.tag_sentence(sentence, offset, &mut doc.tokens);
            let tokens = &doc.tokens[first..];

            doc.entities.extend(self.find_entities(text, tokens));
            doc.noun_chunks.extend(Self::find_noun_chunks(text, tokens));
        }

        doc
    }

    fn tag_sentence(&self, sentence: &str, offset: usize, out: &mut Vec<Token>) {
        let mut previous: Option<PartOfSpeech> = None;
        let mut sentence_start = true;

        for (start, word) in sentence.split_word_bound_indices() {
            if word.chars().all(char::is_whitespace) {
                continue;
            }

            let lower = word.to_lowercase();
            let is_punct = !word.chars().any(char::is_alphanumeric);
            let is_alpha = word.chars().all(char::is_alphabetic);

            let pos = if is_punct {
                PartOfSpeech::Punct
            } else {
                self.classify(word, &lower, previous, sentence_start)
            };
            let lemma = self.lemmatize(&lower, pos);

            out.push(Token {
                is_stop: self.stop_words.contains(lower.as_str()),
                text: lower,
                lemma,
                pos,
                is_alpha,
                is_punct,
                start: offset + start,
                end: offset + start + word.len(),
            });

            if !is_punct {
                sentence_start = false;
            }
            previous = Some(pos);
        }
    }

    fn classify(
        &self,
        word: &str,
        lower: &str,
        previous: Option<PartOfSpeech>,
        sentence_start: bool,
    ) -> PartOfSpeech {
        if let Some(pos) = self.closed_class.get(lower) {
            return *pos;
        }

        if lower.chars().any(|c| c.is_ascii_digit())
            && lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return PartOfSpeech::Num;
        }

        let capitalized = word.chars().next().map_or(false, char::is_uppercase);
        if capitalized && !sentence_start {
            return PartOfSpeech::Propn;
        }

        let after_nominal_context = matches!(
            previous,
            Some(PartOfSpeech::Det | PartOfSpeech::Adj | PartOfSpeech::Num)
        );

        if let Some(pos) = self.open_class.get(lower) {
            // Verbs used after a determiner or adjective act as nouns ("the design").
            if *pos == PartOfSpeech::Verb && after_nominal_context {
                return PartOfSpeech::Noun;
            }
            return *pos;
        }

        let len = lower.chars().count();
        if len > 4 && lower.ends_with("ly") {
            return PartOfSpeech::Adv;
        }
        if len > 5 && lower.ends_with("ing") {
            return match previous {
                Some(p) if after_nominal_context || p.is_nominal() => PartOfSpeech::Noun,
                _ => PartOfSpeech::Verb,
            };
        }
        if len > 4 && lower.ends_with("ed") {
            return match previous {
                Some(PartOfSpeech::Det | PartOfSpeech::Adv) => PartOfSpeech::Adj,
                _ => PartOfSpeech::Verb,
            };
        }
        if len > 5
            && ["ical", "ful", "ous", "ive", "able", "ible"]
                .iter()
                .any(|suffix| lower.ends_with(suffix))
        {
            return PartOfSpeech::Adj;
        }

        PartOfSpeech::Noun
    }

    fn lemmatize(&self, lower: &str, pos: PartOfSpeech) -> String {
        if self.exceptions.contains(lower) {
            return lower.to_string();
        }
        if let Some(lemma) = self.lemmas.get(lower) {
            return lemma.clone();
        }
        if !lower.chars().all(char::is_alphabetic) {
            return lower.to_string();
        }

        match pos {
            PartOfSpeech::Noun | PartOfSpeech::Propn => Self::singularize(lower),
            PartOfSpeech::Verb => Self::verb_base(lower),
            _ => lower.to_string(),
        }
    }

    fn singularize(word: &str) -> String {
        let len = word.len();
        if len <= 3 || !word.ends_with('s') {
            return word.to_string();
        }
        if len > 4 && word.ends_with("ies") {
            return format!("{}y", &word[..len - 3]);
        }
        if word.ends_with("sses") {
            return word[..len - 2].to_string();
        }
        if ["ches", "shes", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
            return word[..len - 2].to_string();
        }
        if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
            return word.to_string();
        }
        word[..len - 1].to_string()
    }

    fn verb_base(word: &str) -> String {
        let len = word.len();
        let stem = if len > 5 && word.ends_with("ing") {
            &word[..len - 3]
        } else if len > 4 && word.ends_with("ied") {
            return format!("{}y", &word[..len - 3]);
        } else if len > 4 && word.ends_with("ed") {
            &word[..len - 2]
        } else if len > 4 && word.ends_with("ies") {
            return format!("{}y", &word[..len - 3]);
        } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
            return word[..len - 1].to_string();
        } else {
            return word.to_string();
        };

        let mut tail = stem.char_indices().rev();
        if let (Some((last_at, last)), Some((_, prev))) = (tail.next(), tail.next()) {
            if last == prev && last.is_ascii_alphabetic() && !matches!(last, 'l' | 's' | 'e') {
                return stem[..last_at].to_string();
            }
        }
        if stem.ends_with("at")
            || stem.ends_with("iz")
            || stem.ends_with(&['v', 'g', 'c', 'u'][..])
        {
            return format!("{}e", stem);
        }
        stem.to_string()
    }

    fn entity_key(name: &str) -> Vec<String> {
        name.split_word_bounds()
            .filter(|w| !w.chars().all(char::is_whitespace))
            .map(|w| w.to_lowercase())
            .collect()
    }

    fn find_entities(&self, text: &str, tokens: &[Token]) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let longest = self.max_entity_tokens.min(tokens.len() - i);
            let found = (1..=longest).rev().find_map(|n| {
                let key: Vec<String> = tokens[i..i + n].iter().map(|t| t.text.clone()).collect();
                self.gazetteer.get(&key).map(|label| (n, *label))
            });

            match found {
                Some((n, label)) => {
                    let span = &text[tokens[i].start..tokens[i + n - 1].end];
                    entities.push(Entity {
                        text: span.to_string(),
                        label,
                    });
                    i += n;
                }
                None => i += 1,
            }
        }

        entities
    }

    /// Optional determiner, any adjective/noun/number modifiers, nominal head.
    fn find_noun_chunks(text: &str, tokens: &[Token]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let start = i;
            let mut j = i;
            if tokens[j].pos == PartOfSpeech::Det {
                j += 1;
            }
            while j < tokens.len() && tokens[j].pos.is_chunk_modifier() {
                j += 1;
            }

            let head = (start..j).rev().find(|&k| tokens[k].pos.is_nominal());
            match head {
                Some(head) => {
                    chunks.push(text[tokens[start].start..tokens[head].end].to_string());
                    i = head + 1;
                }
                None => i = start + 1,
            }
        }

        chunks
    }
}

/// Create the process-wide tagger. Later calls return the existing instance.
///
/// With `lexicon_path` set the lexicon is read from that file and any problem
/// with it is reported as [`SmartAtsError::LinguisticResource`].
pub fn initialize(lexicon_path: Option<&Path>) -> Result<Arc<Tagger>> {
    if let Some(tagger) = SHARED_TAGGER.get() {
        return Ok(Arc::clone(tagger));
    }

    let tagger = match lexicon_path {
        Some(path) => {
            info!("Loading tagger lexicon from {}", path.display());
            Tagger::from_file(path)?
        }
        None => Tagger::embedded()?,
    };

    Ok(Arc::clone(SHARED_TAGGER.get_or_init(|| Arc::new(tagger))))
}

/// The tagger created by [`initialize`].
pub fn shared() -> Result<Arc<Tagger>> {
    SHARED_TAGGER.get().cloned().ok_or_else(|| {
        SmartAtsError::LinguisticResource(
            "Tagger has not been initialized; call tagger::initialize first".to_string(),
        )
    })
}
