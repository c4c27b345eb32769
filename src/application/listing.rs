//! Search, category filtering and pagination over an already-fetched list.
//!
//! The public site and the admin client share this derivation so both
//! surfaces slice the same posts into the same pages.

pub const PAGE_SIZE: usize = 6;
pub const RECENT_POSTS: usize = 3;
/// Category option that disables the category filter.
pub const ALL_CATEGORIES: &str = "All Categories";

/// What the listing filters need to know about a post.
pub trait Listable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn content(&self) -> &str;
    fn has_category(&self, name: &str) -> bool;
}

impl Listable for crate::domain::entities::PostWithCategories {
    fn title(&self) -> &str {
        &self.post.title
    }

    fn description(&self) -> &str {
        &self.post.description
    }

    fn content(&self) -> &str {
        &self.post.content
    }

    fn has_category(&self, name: &str) -> bool {
        self.category_names().any(|candidate| candidate == name)
    }
}

/// Number of pages for `count` matches; never less than one.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Items shown on the 1-based `page`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    query: String,
    category: Option<String>,
    page: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            page: 1,
        }
    }
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Selected category name, `None` when showing every category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the search text and returns to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Selects a category by name and returns to page 1. An empty name or
    /// [`ALL_CATEGORIES`] clears the filter.
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.category = if category.is_empty() || category == ALL_CATEGORIES {
            None
        } else {
            Some(category)
        };
        self.page = 1;
    }

    /// Moves to `page` when it lies in `1..=total_pages`; otherwise nothing
    /// changes. Returns whether the page moved.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page == 0 || page > total_pages {
            return false;
        }
        self.page = page;
        true
    }

    /// Case-insensitive substring match on title, description and content,
    /// combined with the exact category-name match.
    pub fn matches<T: Listable>(&self, post: &T) -> bool {
        self.matches_query(post) && self.matches_category(post)
    }

    fn matches_query<T: Listable>(&self, post: &T) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [post.title(), post.description(), post.content()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category<T: Listable>(&self, post: &T) -> bool {
        match self.category.as_deref() {
            Some(name) => post.has_category(name),
            None => true,
        }
    }

    pub fn filter<'a, T: Listable>(&self, posts: &'a [T]) -> Vec<&'a T> {
        posts.iter().filter(|post| self.matches(*post)).collect()
    }

    /// Filters `posts` and cuts out the current page.
    pub fn view<'a, T: Listable>(&self, posts: &'a [T]) -> ListingPage<'a, T> {
        let matches = self.filter(posts);
        let total_matches = matches.len();
        let total_pages = total_pages(total_matches);
        let items = page_slice(&matches, self.page).to_vec();
        ListingPage {
            items,
            page: self.page,
            total_pages,
            total_matches,
        }
    }
}

#[derive(Debug)]
pub struct ListingPage<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl<T> ListingPage<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Card {
        title: &'static str,
        description: &'static str,
        content: &'static str,
        categories: Vec<&'static str>,
    }

    fn card(title: &'static str) -> Card {
        Card {
            title,
            description: "",
            content: "",
            categories: Vec::new(),
        }
    }

    impl Listable for Card {
        fn title(&self) -> &str {
            self.title
        }
        fn description(&self) -> &str {
            self.description
        }
        fn content(&self) -> &str {
            self.content
        }
        fn has_category(&self, name: &str) -> bool {
            self.categories.contains(&name)
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let posts = vec![card("Alpha"), card("Beta"), card("gamma-Alpha")];
        let mut state = ListingState::new();
        state.set_query("alpha");

        let titles: Vec<_> = state.filter(&posts).iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Alpha", "gamma-Alpha"]);
    }

    #[test]
    fn search_covers_description_and_content() {
        let mut by_description = card("One");
        by_description.description = "All about Lifetimes";
        let mut by_content = card("Two");
        by_content.content = "we talk LIFETIMES here";
        let posts = vec![by_description, by_content, card("Three")];

        let mut state = ListingState::new();
        state.set_query("lifetimes");
        assert_eq!(state.filter(&posts).len(), 2);

        state.set_query("   ");
        assert_eq!(state.filter(&posts).len(), 3);
    }

    #[test]
    fn category_filter_is_exact_and_combines_with_search() {
        let mut design = card("Design tokens");
        design.categories = vec!["Design"];
        let mut dev = card("Design in code");
        dev.categories = vec!["Development", "design"];
        let posts = vec![design, dev, card("Unrelated")];

        let mut state = ListingState::new();
        state.set_category("Design");
        let titles: Vec<_> = state.filter(&posts).iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Design tokens"]);

        state.set_query("code");
        assert!(state.filter(&posts).is_empty());

        state.set_category(ALL_CATEGORIES);
        assert_eq!(state.category(), None);
        assert_eq!(state.filter(&posts).len(), 1);
    }

    #[test]
    fn thirteen_posts_make_three_pages() {
        let posts: Vec<Card> = (0..13).map(|_| card("Post")).collect();
        let mut state = ListingState::new();

        let first = state.view(&posts);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 6);
        assert!(!first.has_previous());
        assert!(first.has_next());

        assert!(state.go_to_page(3, first.total_pages));
        let last = state.view(&posts);
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_next());
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let mut state = ListingState::new();
        assert!(state.go_to_page(2, 3));
        assert!(!state.go_to_page(0, 3));
        assert!(!state.go_to_page(4, 3));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn changing_filters_resets_to_first_page() {
        let mut state = ListingState::new();
        state.go_to_page(3, 3);
        state.set_query("rust");
        assert_eq!(state.page(), 1);

        state.go_to_page(2, 3);
        state.set_category("Design");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(6), 1);
        assert_eq!(total_pages(7), 2);
        let empty: Vec<Card> = Vec::new();
        assert!(page_slice(&empty, 1).is_empty());
    }
}
