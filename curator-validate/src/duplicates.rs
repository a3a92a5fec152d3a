//! Corpus-wide duplicate detection on case-folded names and normalized URLs.

use std::collections::BTreeMap;

use curator_core::Record;

/// Map each file that collides with another on `name` or `url` to one message
/// per colliding key, each naming the *other* files sharing that key.
///
/// The result depends only on the grouping, not on iteration order.
pub fn find_duplicates<'a, I>(records: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = (&'a str, &'a Record)>,
{
    let mut by_name: BTreeMap<String, Vec<&'a str>> = BTreeMap::new();
    let mut by_url: BTreeMap<String, Vec<&'a str>> = BTreeMap::new();
    for (file, record) in records {
        by_name.entry(record.name.folded()).or_default().push(file);
        by_url.entry(record.normalized_url()).or_default().push(file);
    }

    let mut conflicts: BTreeMap<String, Vec<String>> = BTreeMap::new();
    collect(&mut conflicts, by_name, "name");
    collect(&mut conflicts, by_url, "url");
    conflicts
}

fn collect(
    conflicts: &mut BTreeMap<String, Vec<String>>,
    groups: BTreeMap<String, Vec<&str>>,
    kind: &str,
) {
    for (key, mut files) in groups {
        if files.len() < 2 {
            continue;
        }
        files.sort_unstable();
        for (i, file) in files.iter().enumerate() {
            let others: Vec<&str> = files
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| *other)
                .collect();
            conflicts.entry(file.to_string()).or_default().push(format!(
                "duplicate {kind} \"{key}\" also used by {}",
                others.join(", ")
            ));
        }
    }
}
