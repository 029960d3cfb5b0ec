pub mod slug;

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::i18n::I18n;
use crate::statement::Statement;
pub use slug::slugify;

static COUNT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+\)$").expect("valid count suffix regex"));

/// One selectable option in a filter category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl FilterOption {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            count: None,
        }
    }

    /// Title with any trailing `" (count)"` removed. For speakers this is the
    /// `person` value the option was built from.
    pub fn name(&self) -> &str {
        match COUNT_SUFFIX.find(&self.title) {
            Some(m) => &self.title[..m.start()],
            None => &self.title,
        }
    }
}

/// The independent filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Theme,
    Sector,
    Speaker,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Theme, Category::Sector, Category::Speaker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Theme => "theme",
            Category::Sector => "sector",
            Category::Speaker => "speaker",
        }
    }
}

/// Static theme and sector options, localized once at construction.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    themes: Vec<FilterOption>,
    sectors: Vec<FilterOption>,
}

impl FilterCatalog {
    pub fn new(i18n: &I18n) -> Self {
        let themes = vec![
            FilterOption::new("civilian-harm", &i18n.civilian_harm),
            FilterOption::new("starvation", &i18n.starvation),
            FilterOption::new("infrastructure", &i18n.destruction_infrastructure),
            FilterOption::new("displacement", &i18n.annexation_displacement),
        ];
        let sectors = vec![
            FilterOption::new("armed-forces", &i18n.armed_forces),
            FilterOption::new("decision-makers", &i18n.decision_makers),
            FilterOption::new("legislators", &i18n.legislators),
            FilterOption::new("public-figures", &i18n.public_figures),
            FilterOption::new("former-government", &i18n.former_government),
            FilterOption::new("media", &i18n.media),
            FilterOption::new("other", &i18n.other),
        ];
        Self { themes, sectors }
    }

    pub fn themes(&self) -> &[FilterOption] {
        &self.themes
    }

    pub fn sectors(&self) -> &[FilterOption] {
        &self.sectors
    }
}

/// Speaker options for a statement list: one per distinct `person`, most
/// prolific first, ties in order of first appearance.
pub fn persons(statements: &[Statement]) -> Vec<FilterOption> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for statement in statements {
        let count = counts.entry(statement.person.as_str()).or_insert(0);
        if *count == 0 {
            order.push(statement.person.as_str());
        }
        *count += 1;
    }

    let mut taken: HashSet<String> = HashSet::new();
    let mut options: Vec<FilterOption> = order
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let count = counts[name];
            FilterOption {
                slug: unique_slug(name, index, &mut taken),
                title: format!("{name} ({count})"),
                count: Some(count),
            }
        })
        .collect();
    // Stable sort keeps first-occurrence order among equal counts.
    options.sort_by(|a, b| b.count.cmp(&a.count));
    options
}

/// Slug for the `index`-th distinct speaker. Names with no slug-able
/// characters get `speaker-{index}`; collisions get `-2`, `-3`, ... in
/// first-appearance order.
fn unique_slug(name: &str, index: usize, taken: &mut HashSet<String>) -> String {
    let mut base = slugify(name);
    if base.is_empty() {
        base = format!("speaker-{}", index + 1);
    }
    let mut slug = base.clone();
    let mut n = 2;
    while taken.contains(&slug) {
        slug = format!("{base}-{n}");
        n += 1;
    }
    taken.insert(slug.clone());
    slug
}

/// Speaker options whose name contains `phrase`, ignoring case.
pub fn visible_persons<'a>(persons: &'a [FilterOption], phrase: &str) -> Vec<&'a FilterOption> {
    let needle = phrase.trim().to_lowercase();
    persons
        .iter()
        .filter(|p| needle.is_empty() || p.name().to_lowercase().contains(&needle))
        .collect()
}

/// Look up options by slug, dropping slugs the catalog does not know.
pub fn resolve(options: &[FilterOption], slugs: &[&str]) -> Vec<FilterOption> {
    slugs
        .iter()
        .filter_map(|slug| options.iter().find(|o| o.slug == *slug))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{normalize, RawStatement};

    fn statements_by(people: &[&str]) -> Vec<Statement> {
        people
            .iter()
            .enumerate()
            .map(|(i, person)| {
                normalize(
                    RawStatement {
                        id: i as u64,
                        person: person.to_string(),
                        ..RawStatement::default()
                    },
                    &I18n::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_static_catalogs_in_declaration_order() {
        let catalog = FilterCatalog::new(&I18n::default());
        let themes: Vec<&str> = catalog.themes().iter().map(|o| o.slug.as_str()).collect();
        assert_eq!(themes, ["civilian-harm", "starvation", "infrastructure", "displacement"]);
        assert_eq!(catalog.sectors().len(), 7);
        assert_eq!(catalog.sectors()[5].slug, "media");
        assert_eq!(catalog.sectors()[5].title, "Media");
    }

    #[test]
    fn test_catalog_is_localized() {
        let i18n = I18n {
            starvation: "Famine".to_string(),
            ..I18n::default()
        };
        let catalog = FilterCatalog::new(&i18n);
        assert_eq!(catalog.themes()[1].title, "Famine");
        assert_eq!(catalog.themes()[1].slug, "starvation");
    }

    #[test]
    fn test_persons_counts_and_order() {
        let statements = statements_by(&["Carol", "Alice", "Bob", "Alice", "Bob", "Alice", "Dan"]);
        let options = persons(&statements);

        let titles: Vec<&str> = options.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, ["Alice (3)", "Bob (2)", "Carol (1)", "Dan (1)"]);
        assert_eq!(options[0].slug, "alice");

        let total: usize = options.iter().filter_map(|o| o.count).sum();
        assert_eq!(total, statements.len());
        assert!(options.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_persons_slugs_are_unique() {
        let options = persons(&statements_by(&["José Núñez", "Jose Nunez", "JOSE NUNEZ"]));
        let slugs: Vec<&str> = options.iter().map(|o| o.slug.as_str()).collect();
        assert_eq!(slugs, ["jose-nunez", "jose-nunez-2", "jose-nunez-3"]);
    }

    #[test]
    fn test_persons_slugs_are_never_empty() {
        let options = persons(&statements_by(&["Bob", "???", ""]));
        let slugs: Vec<&str> = options.iter().map(|o| o.slug.as_str()).collect();
        assert_eq!(slugs, ["bob", "speaker-2", "speaker-3"]);
        assert_eq!(resolve(&options, &["speaker-2"])[0].title, "??? (1)");
    }

    #[test]
    fn test_persons_empty() {
        assert!(persons(&[]).is_empty());
    }

    #[test]
    fn test_name_strips_count() {
        let option = FilterOption::new("jose-nunez", "José Núñez (12)");
        assert_eq!(option.name(), "José Núñez");
        assert_eq!(FilterOption::new("x", "Unit (IDF)").name(), "Unit (IDF)");
    }

    #[test]
    fn test_visible_persons() {
        let options = persons(&statements_by(&["Alice Smith", "Bob Jones", "alice cooper"]));
        let visible: Vec<&str> = visible_persons(&options, "ALICE")
            .iter()
            .map(|o| o.slug.as_str())
            .collect();
        assert_eq!(visible, ["alice-smith", "alice-cooper"]);
        assert_eq!(visible_persons(&options, "  ").len(), 3);
        // Matching ignores the count suffix.
        assert!(visible_persons(&options, "(1)").is_empty());
    }

    #[test]
    fn test_resolve_drops_unknown() {
        let catalog = FilterCatalog::new(&I18n::default());
        let resolved = resolve(catalog.sectors(), &["media", "nope", "other"]);
        let slugs: Vec<&str> = resolved.iter().map(|o| o.slug.as_str()).collect();
        assert_eq!(slugs, ["media", "other"]);
    }
}
