//! Render targets for the console front end.
//!
//! The display is write-only: workflows push snapshots out through
//! [`PageView`] and never read anything back from it. All live values stay
//! in `core::state`.

/// What the admin page shows after a refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminSnapshot {
    pub form_key: Option<String>,
}

/// A render target for the two page surfaces.
pub trait PageView {
    /// Shows the number to dial: display text plus the dialable link.
    fn show_number(&mut self, number: &str, href: &str);

    /// Replaces the embedded survey form.
    fn show_embed(&mut self, url: &str);

    /// Tells the operator every recipient has been contacted.
    fn show_pool_exhausted(&mut self);

    /// Redraws the admin page after a mutation was acked.
    fn show_admin(&mut self, snapshot: &AdminSnapshot);
}

/// Builds the dialable link for a number. The `?call` suffix marks the link
/// as a dial-out for click tracking.
pub fn tel_href(number: &str) -> String {
    format!("tel:{number}?call")
}

/// Builds the URL of the hosted survey form for `form_key`.
pub fn embed_url(base: &str, form_key: &str) -> String {
    format!("{}?formkey={}", base.trim_end_matches('/'), form_key)
}

/// Renders to stdout.
pub struct ConsoleView;

impl PageView for ConsoleView {
    fn show_number(&mut self, number: &str, href: &str) {
        println!("Call next: {number}  ({href})");
    }

    fn show_embed(&mut self, url: &str) {
        println!("Survey form: {url}");
    }

    fn show_pool_exhausted(&mut self) {
        println!("No uncalled numbers left.");
    }

    fn show_admin(&mut self, snapshot: &AdminSnapshot) {
        match &snapshot.form_key {
            Some(key) => println!("Current form key: {key}"),
            None => println!("No form key set."),
        }
    }
}
