
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use fst::{Set, SetBuilder};

/// The words that can be played
pub trait WordSet: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

impl<D: AsRef<[u8]> + Send + Sync> WordSet for Set<D> {
    fn contains(&self, word: &str) -> bool {
        Set::contains(self, word.as_bytes())
    }
}

impl WordSet for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }
}

impl WordSet for BTreeSet<String> {
    fn contains(&self, word: &str) -> bool {
        BTreeSet::contains(self, word)
    }
}

/// Accepts no word at all, used when the word list of a game is not needed
pub struct EmptyWordSet;
impl WordSet for EmptyWordSet {
    fn contains(&self, _word: &str) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("cannot read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot build word set: {0}")]
    Fst(#[from] fst::Error),
    #[error("word list {0:?} is neither a .txt nor a .fst file")]
    UnsupportedExtension(std::path::PathBuf),
}

/// Build an in-memory set from a list of words
///
/// Words are trimmed and lowercased, empty lines are skipped
pub fn word_set_from_words<S: AsRef<str>>(words: impl IntoIterator<Item=S>) -> Result<Set<Vec<u8>>, DictionaryError> {
    let start = Instant::now();
    let mut words = words.into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>();
    words.sort_unstable();
    words.dedup();
    log::debug!("words sorted in {:?}", Instant::now() - start);

    let start = Instant::now();
    let mut build = SetBuilder::memory();
    build.extend_iter(words)?;
    let set = build.into_set();
    log::info!("dictionary built in {:?} ({} words)", Instant::now() - start, set.len());
    Ok(set)
}

/// Load the words that are allowed to be played.
///
/// Either a `.txt` file with one word per line, or a `.fst` file containing a prebuilt set
pub fn load_word_set(path: &Path) -> Result<Set<Vec<u8>>, DictionaryError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("fst") => {
            let start = Instant::now();
            let data = std::fs::read(path)?;
            let set = Set::new(data)?;
            log::info!("dictionary loaded in {:?}", Instant::now() - start);
            Ok(set)
        },
        Some("txt") => {
            let start = Instant::now();
            let file = BufReader::new(File::open(path)?);
            let words = file.lines().collect::<Result<Vec<_>, _>>()?;
            log::info!("words loaded in {:?}", Instant::now() - start);
            word_set_from_words(words)
        },
        _ => Err(DictionaryError::UnsupportedExtension(path.to_owned())),
    }
}

/// The name a word list is known by: its file name without extension
pub fn word_set_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}


#[test]
fn builds_set_from_unsorted_words() {
    let set = word_set_from_words(vec!["pups", "Kit", "", "pups", "  spit "]).unwrap();
    assert!(WordSet::contains(&set, "pups"));
    assert!(WordSet::contains(&set, "kit"));
    assert!(WordSet::contains(&set, "spit"));
    assert!(!WordSet::contains(&set, "Kit"));
    assert!(!WordSet::contains(&set, ""));
    assert_eq!(set.len(), 3);
}

#[test]
fn std_sets_are_word_sets() {
    let words: HashSet<String> = vec!["pup".to_owned()].into_iter().collect();
    let sorted: BTreeSet<String> = words.iter().cloned().collect();
    let sets: [&dyn WordSet; 3] = [&words, &sorted, &EmptyWordSet];
    assert_eq!(sets.iter().map(|s| s.contains("pup")).collect::<Vec<_>>(), vec![true, true, false]);
}

#[test]
fn rejects_unknown_extension() {
    match load_word_set(Path::new("words.csv")) {
        Err(DictionaryError::UnsupportedExtension(p)) => assert_eq!(p, Path::new("words.csv")),
        other => panic!("unexpected {:?}", other.map(|s| s.len())),
    }
    assert_eq!(word_set_name(Path::new("/data/lists/collins.fst")), "collins");
}
