//! Browse view: the full paper catalog with category and free-text
//! filtering, recomputed client-side over the already-fetched list.

use crate::api::PaperApi;
use crate::error::ApiError;
use crate::models::{Category, Paper};

/// Synthetic category representing "no filter".
pub const ALL_CATEGORY: &str = "All";

pub struct BrowseView {
    papers: Vec<Paper>,
    categories: Vec<Category>,
    pub selected_category: String,
    pub query: String,
}

impl BrowseView {
    pub fn new() -> Self {
        Self {
            papers: Vec::new(),
            categories: vec![all_entry()],
            selected_category: ALL_CATEGORY.to_string(),
            query: String::new(),
        }
    }

    /// Fetch papers and categories. The two loads are independent: a
    /// categories failure leaves just the "All" entry and is logged, while
    /// a papers failure empties the list and is returned to the caller.
    pub async fn load(&mut self, api: &dyn PaperApi) -> Result<(), ApiError> {
        let (papers, categories) = tokio::join!(api.list_papers(), api.list_categories());

        match categories {
            Ok(cats) => self.set_categories(cats),
            Err(e) => {
                eprintln!("[browse] categories unavailable: {}", e);
                self.categories = vec![all_entry()];
            }
        }

        self.papers = papers?;
        Ok(())
    }

    pub fn set_papers(&mut self, papers: Vec<Paper>) {
        self.papers = papers;
    }

    /// Replace the category facets, always keeping "All" at the front.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        let mut list = vec![all_entry()];
        list.extend(categories);
        self.categories = list;
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Select a category by id or display name; unknown selections are
    /// rejected so the filter can never reference a facet that isn't shown.
    pub fn select_category(&mut self, selection: &str) -> bool {
        match self
            .categories
            .iter()
            .find(|c| c.id == selection || c.name.eq_ignore_ascii_case(selection))
        {
            Some(cat) => {
                self.selected_category = if cat.name == ALL_CATEGORY {
                    ALL_CATEGORY.to_string()
                } else {
                    cat.id.clone()
                };
                true
            }
            None => false,
        }
    }

    /// The papers passing both the category and the text predicate.
    pub fn filtered(&self) -> Vec<&Paper> {
        self.papers
            .iter()
            .filter(|p| paper_matches(p, &self.selected_category, &self.query))
            .collect()
    }

    /// True when the current filters produce no papers; callers render an
    /// explicit "no papers found" state instead of an empty list.
    pub fn is_empty(&self) -> bool {
        self.filtered().is_empty()
    }
}

impl Default for BrowseView {
    fn default() -> Self {
        Self::new()
    }
}

fn all_entry() -> Category {
    Category {
        id: ALL_CATEGORY.to_string(),
        name: ALL_CATEGORY.to_string(),
    }
}

/// Filter predicate: a paper passes if the selected category is "All" or
/// matches its category reference, and the query (case-insensitive) is
/// empty or appears in the title or description.
pub fn paper_matches(paper: &Paper, selected_category: &str, query: &str) -> bool {
    let category_ok = selected_category == ALL_CATEGORY
        || paper.category_id.as_deref() == Some(selected_category);

    if !category_ok {
        return false;
    }

    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    paper.name.to_lowercase().contains(&needle)
        || paper.description.to_lowercase().contains(&needle)
}
