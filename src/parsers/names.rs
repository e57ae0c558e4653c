use std::collections::{HashMap, HashSet};

/// Gives every card name in a run a unique display form.
///
/// The k-th occurrence of a name (in document order) becomes the name with
/// `k` appended and no separator: `Foo`, `Foo2`, `Foo3`. If that suffixed
/// form was already handed out (because the page also lists a card literally
/// called `Foo2`) the suffix keeps counting up until the result is free.
#[derive(Debug, Default)]
pub struct NameDisambiguator {
    occurrences: HashMap<String, usize>,
    emitted: HashSet<String>,
}

impl NameDisambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disambiguate(&mut self, name: &str) -> String {
        let count = self.occurrences.entry(name.to_string()).or_insert(0);

        loop {
            *count += 1;
            let candidate = if *count == 1 {
                name.to_string()
            } else {
                format!("{}{}", name, count)
            };

            if self.emitted.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
