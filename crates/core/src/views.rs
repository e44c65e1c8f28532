//! View State
//!
//! Which page the storefront shows, plus the selections that go with it.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

use crate::products::ProductId;

/// Pseudo-category matching every product.
pub const ALL_CATEGORIES: &str = "All";

/// Storefront pages. Exactly one is shown at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageView {
    /// Landing page
    #[default]
    Home,

    /// Product listing, filtered by category
    Shop,

    /// Single product details
    Product,

    /// About the brand
    About,

    /// Contact form
    Contact,

    /// Full cart page
    Cart,

    /// Seller onboarding
    SellWithFabrima,

    /// Vendor sign in
    VendorLogin,

    /// Customer sign in
    UserLogin,

    /// Customer registration
    SignUp,

    /// Delivery partner programme
    ZomatoPartner,
}

impl PageView {
    /// Every page, in navigation order.
    pub const ALL: [PageView; 11] = [
        PageView::Home,
        PageView::Shop,
        PageView::Product,
        PageView::About,
        PageView::Contact,
        PageView::Cart,
        PageView::SellWithFabrima,
        PageView::VendorLogin,
        PageView::UserLogin,
        PageView::SignUp,
        PageView::ZomatoPartner,
    ];

    /// Stable upper snake case name.
    pub fn as_str(self) -> &'static str {
        match self {
            PageView::Home => "HOME",
            PageView::Shop => "SHOP",
            PageView::Product => "PRODUCT",
            PageView::About => "ABOUT",
            PageView::Contact => "CONTACT",
            PageView::Cart => "CART",
            PageView::SellWithFabrima => "SELL_WITH_FABRIMA",
            PageView::VendorLogin => "VENDOR_LOGIN",
            PageView::UserLogin => "USER_LOGIN",
            PageView::SignUp => "SIGN_UP",
            PageView::ZomatoPartner => "ZOMATO_PARTNER",
        }
    }
}

impl Display for PageView {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unknown page name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown page: {0}")]
pub struct UnknownPage(String);

impl FromStr for PageView {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();

        PageView::ALL
            .into_iter()
            .find(|page| page.as_str() == normalized)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Current page and selections, owned by the storefront controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    page: PageView,
    selected_category: String,
    selected_product: Option<ProductId>,
    cart_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: PageView::Home,
            selected_category: ALL_CATEGORIES.to_string(),
            selected_product: None,
            cart_open: false,
        }
    }
}

impl ViewState {
    /// Start on the home page with every category selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page currently shown.
    pub fn page(&self) -> PageView {
        self.page
    }

    /// Category used to filter the shop page.
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    /// Product shown on the product page.
    pub fn selected_product(&self) -> Option<&ProductId> {
        self.selected_product.as_ref()
    }

    /// Whether the cart preview is open.
    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    /// Switch to `page`.
    pub fn navigate(&mut self, page: PageView) {
        self.page = page;
    }

    /// Filter the shop by `category` and show the shop.
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
        self.navigate(PageView::Shop);
    }

    /// Show the product page for `product`.
    pub fn select_product(&mut self, product: ProductId) {
        self.selected_product = Some(product);
        self.navigate(PageView::Product);
    }

    /// Open the cart preview.
    pub fn open_cart(&mut self) {
        self.cart_open = true;
    }

    /// Close the cart preview.
    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }
}
