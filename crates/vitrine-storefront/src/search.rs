//! Header search box, the search results page and the compare list.

use crate::{require_click, set_checked};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use vitrine::{
    AttributeAssertions, BrowserSession, Gateway, GatewayResult, Locator, MismatchReport,
    PageObject, PageRoute,
};

/// Header search box
pub const SEARCH_BOX: Locator = Locator::id("small-searchterms");
/// Header "Search" button
pub const SEARCH_BOX_BUTTON: Locator = Locator::class_name("search-box-button");
/// Keyword field on the search page
pub const KEYWORD: Locator = Locator::id("q");
/// "Search" button on the search page
pub const KEYWORD_BUTTON: Locator = Locator::class_name("search-button");
/// "No products were found" message
pub const NO_RESULT: Locator = Locator::class_name("no-result");
/// "Advanced search" checkbox
pub const ADVANCED_SEARCH: Locator = Locator::id("advs");
/// "Automatically search sub categories" checkbox
pub const SUB_CATEGORIES: Locator = Locator::id("isc");
/// "Search In product descriptions" checkbox
pub const DESCRIPTIONS: Locator = Locator::id("sid");
/// Category dropdown of the advanced search
pub const CATEGORY: Locator = Locator::id("cid");
/// "Sort by" dropdown
pub const SORT_BY: Locator = Locator::id("products-orderby");
/// "Display" page size dropdown
pub const PAGE_SIZE: Locator = Locator::id("products-pagesize");
/// One result in the product grid or list
pub const PRODUCT_ITEM: Locator = Locator::class_name("product-item");
/// Title link inside a result
pub const PRODUCT_TITLE: Locator = Locator::class_name("product-title");
/// Grid view switch
pub const GRID_VIEW: Locator = Locator::css("a[data-viewmode='grid']");
/// List view switch
pub const LIST_VIEW: Locator = Locator::css("a[data-viewmode='list']");
/// "Add to compare list" on a result
pub const ADD_TO_COMPARE: Locator = Locator::class_name("add-to-compare-list-button");
/// Footer link to the compare list
pub const COMPARE_LIST_LINK: Locator = Locator::link_text("Compare products list");
/// "You have no items to compare" message
pub const COMPARE_LIST_EMPTY: Locator = Locator::class_name("no-data");

/// Placeholders the search forms are expected to show
pub const PLACEHOLDERS: [(Locator, &'static str); 1] = [(SEARCH_BOX, "Search store")];

/// Options of the "Sort by" dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Position,
    NameAscending,
    NameDescending,
    PriceAscending,
    PriceDescending,
    CreatedOn,
}

impl SortOrder {
    /// Label as the dropdown shows it
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::NameAscending => "Name: A to Z",
            Self::NameDescending => "Name: Z to A",
            Self::PriceAscending => "Price: Low to High",
            Self::PriceDescending => "Price: High to Low",
            Self::CreatedOn => "Created on",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advanced search form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedSearch {
    /// Text for the keyword field
    pub keyword: String,
    /// Category label; `None` keeps "All"
    pub category: Option<String>,
    /// Tick "Automatically search sub categories"
    pub sub_categories: bool,
    /// Tick "Search In product descriptions"
    pub descriptions: bool,
}

impl AdvancedSearch {
    /// Keyword only
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Restrict to a category
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Include sub categories
    #[must_use]
    pub const fn with_sub_categories(mut self) -> Self {
        self.sub_categories = true;
        self
    }

    /// Match product descriptions too
    #[must_use]
    pub const fn with_descriptions(mut self) -> Self {
        self.descriptions = true;
        self
    }
}

/// Search box in the header and the `/search` results page
#[derive(Debug)]
pub struct SearchPage<'g, S: BrowserSession> {
    gateway: &'g mut Gateway<S>,
}

impl<S: BrowserSession> PageObject for SearchPage<'_, S> {
    fn path(&self) -> &str {
        ""
    }

    fn ready_marker(&self) -> Option<Locator> {
        Some(SEARCH_BOX)
    }
}

impl<'g, S: BrowserSession> SearchPage<'g, S> {
    /// Borrow a gateway
    pub fn new(gateway: &'g mut Gateway<S>) -> Self {
        Self { gateway }
    }

    /// Open the home page and wait for the search box
    ///
    /// # Errors
    ///
    /// Fails if the header does not render in time.
    pub fn open(&mut self) -> GatewayResult<()> {
        let route = PageRoute::of(&*self);
        self.gateway.open_page(&route)
    }

    /// Search from the header box
    ///
    /// # Errors
    ///
    /// Fails if the box or its button cannot be reached.
    pub fn search(&mut self, term: &str) -> GatewayResult<()> {
        tracing::info!(term, "searching");
        self.gateway.type_text(&SEARCH_BOX, term)?;
        require_click(self.gateway, &SEARCH_BOX_BUTTON)
    }

    /// Submit the header search with no term and accept the dialog the
    /// storefront raises; returns the dialog text
    ///
    /// # Errors
    ///
    /// [`vitrine::GatewayError::AlertNotFound`] if no dialog appears.
    pub fn search_empty(&mut self) -> GatewayResult<String> {
        self.gateway.type_text(&SEARCH_BOX, "")?;
        require_click(self.gateway, &SEARCH_BOX_BUTTON)?;
        let timeout = self.gateway.default_timeout();
        let text = self.gateway.wait_for_alert(timeout)?;
        self.gateway.accept_alert()?;
        Ok(text)
    }

    /// Titles of the listed products, in page order
    ///
    /// # Errors
    ///
    /// Fails if no product shows within `timeout`.
    pub fn product_titles(&mut self, timeout: Duration) -> GatewayResult<Vec<String>> {
        self.gateway.read_all_text(&PRODUCT_TITLE, timeout)
    }

    /// Number of listed products; zero when none shows within `timeout`
    ///
    /// # Errors
    ///
    /// Propagates session errors.
    pub fn product_count(&mut self, timeout: Duration) -> GatewayResult<usize> {
        if !self.gateway.is_present(&PRODUCT_ITEM, timeout) {
            return Ok(0);
        }
        Ok(self.gateway.find_all(&PRODUCT_ITEM)?.len())
    }

    /// Whether the "No products were found" message shows
    pub fn no_results_visible(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&NO_RESULT, timeout)
    }

    /// Run an advanced search from the results page
    ///
    /// # Errors
    ///
    /// Fails if a control cannot be reached or the category is not offered.
    pub fn advanced_search(&mut self, search: &AdvancedSearch) -> GatewayResult<()> {
        tracing::info!(keyword = %search.keyword, category = ?search.category, "advanced search");
        self.gateway.type_text(&KEYWORD, &search.keyword)?;
        set_checked(self.gateway, &ADVANCED_SEARCH, true)?;
        if let Some(category) = &search.category {
            self.gateway.select_option(&CATEGORY, category)?;
        }
        set_checked(self.gateway, &SUB_CATEGORIES, search.sub_categories)?;
        set_checked(self.gateway, &DESCRIPTIONS, search.descriptions)?;
        require_click(self.gateway, &KEYWORD_BUTTON)
    }

    /// Choose a "Sort by" option
    ///
    /// # Errors
    ///
    /// Fails if the dropdown cannot be reached or lacks the option.
    pub fn sort_by(&mut self, order: SortOrder) -> GatewayResult<()> {
        self.gateway.select_option(&SORT_BY, order.label())
    }

    /// Choose how many products a page shows
    ///
    /// # Errors
    ///
    /// Fails if the dropdown cannot be reached or lacks the option.
    pub fn page_size(&mut self, size: u32) -> GatewayResult<()> {
        self.gateway.select_option(&PAGE_SIZE, &size.to_string())
    }

    /// Switch to grid view
    pub fn grid_view(&mut self) -> bool {
        self.gateway.click(&GRID_VIEW)
    }

    /// Switch to list view
    pub fn list_view(&mut self) -> bool {
        self.gateway.click(&LIST_VIEW)
    }

    /// Add the first listed product to the compare list
    pub fn add_first_to_compare(&mut self) -> bool {
        self.gateway.click(&ADD_TO_COMPARE)
    }

    /// Follow "Compare products list" in the footer
    ///
    /// # Errors
    ///
    /// Fails if the footer link is not clickable.
    pub fn open_compare_list(&mut self) -> GatewayResult<()> {
        self.gateway.scroll_to_footer()?;
        require_click(self.gateway, &COMPARE_LIST_LINK)
    }

    /// Whether the compare list shows its empty message
    pub fn compare_list_empty(&mut self) -> bool {
        let timeout = self.gateway.default_timeout();
        self.gateway.is_visible(&COMPARE_LIST_EMPTY, timeout)
    }

    /// Compare the search box against [`PLACEHOLDERS`]
    ///
    /// # Errors
    ///
    /// Fails if the box never appears; mismatches are in the report.
    pub fn validate_placeholders(&mut self) -> GatewayResult<MismatchReport> {
        let timeout = self.gateway.default_timeout();
        AttributeAssertions::new(self.gateway).assert_placeholders(&PLACEHOLDERS, timeout)
    }
}
