use super::{OrderBy, SelectionState};
use crate::filters::Category;
use crate::statement::Statement;

/// Whether a statement passes every active filter.
///
/// Categories combine with AND; options within a category with OR. An empty
/// category or empty search phrase matches everything.
pub fn matches(statement: &Statement, selection: &SelectionState) -> bool {
    let sectors = selection.selected(Category::Sector);
    if !sectors.is_empty() && !sectors.iter().any(|o| o.slug == statement.sector) {
        return false;
    }

    let themes = selection.selected(Category::Theme);
    if !themes.is_empty()
        && !statement
            .themes
            .iter()
            .any(|theme| themes.iter().any(|o| &o.slug == theme))
    {
        return false;
    }

    let speakers = selection.selected(Category::Speaker);
    if !speakers.is_empty() && !speakers.iter().any(|o| o.name() == statement.person) {
        return false;
    }

    let phrase = selection.debounced_search_phrase();
    phrase.is_empty() || statement.details.contains(phrase)
}

/// The visible statements for a selection, sorted by date key. The sort is
/// stable, so equal keys keep their feed order.
pub fn compile<'a>(statements: &'a [Statement], selection: &SelectionState) -> Vec<&'a Statement> {
    let mut visible: Vec<&Statement> = statements
        .iter()
        .filter(|s| matches(s, selection))
        .collect();
    match selection.order_by() {
        OrderBy::Newest => visible.sort_by(|a, b| b.date_number.cmp(&a.date_number)),
        OrderBy::Oldest => visible.sort_by_key(|s| s.date_number),
    }
    visible
}
