/// A `&'static Selector` compiled once on first use.
///
/// The argument must be a literal CSS selector; an invalid one is a
/// programming error and panics with the offending text.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> = Lazy::new(|| {
            Selector::parse($e).unwrap_or_else(|e| panic!("Invalid selector {:?}: {e}", $e))
        });
        &*SELECTOR
    }};
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    #[test]
    fn selector_matches() {
        let html = Html::parse_fragment(r#"<div class="a">x</div><div class="b">y</div>"#);
        let found = html
            .select(selector!("div.a"))
            .map(|e| e.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(found, ["x"]);
    }
}
