/// Separator between an issue's label and the rest of its title
pub const LABEL_SEPARATOR: char = ':';

/// Replace everything before the first `:` of `title` with `new_prefix`,
/// or prepend `new_prefix:` when the title carries no label.
///
/// `rewrite_prefix("helm:Fix chart", "charts")` gives `"charts:Fix chart"`.
pub fn rewrite_prefix(title: &str, new_prefix: &str) -> String {
    let remainder = match title.split_once(LABEL_SEPARATOR) {
        Some((_, rest)) => rest,
        None => title,
    };

    format!("{}{}{}", new_prefix, LABEL_SEPARATOR, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing_label() {
        assert_eq!(rewrite_prefix("one:Issue title", "two"), "two:Issue title");
    }

    #[test]
    fn test_adds_missing_label() {
        assert_eq!(rewrite_prefix("Issue title", "two"), "two:Issue title");
    }

    #[test]
    fn test_only_first_colon_is_replaced() {
        assert_eq!(
            rewrite_prefix("helm: chart: bump version", "charts"),
            "charts: chart: bump version"
        );
    }

    #[test]
    fn test_edge_titles() {
        assert_eq!(rewrite_prefix("", "two"), "two:");
        assert_eq!(rewrite_prefix(":", "two"), "two:");
        assert_eq!(rewrite_prefix("one:", "two"), "two:");
        assert_eq!(rewrite_prefix(":Issue", "two"), "two:Issue");
    }

    #[test]
    fn test_empty_prefix_strips_label() {
        assert_eq!(rewrite_prefix("one:Issue title", ""), ":Issue title");
    }

    #[test]
    fn test_non_ascii_titles() {
        assert_eq!(rewrite_prefix("ドキュメント:修正", "docs"), "docs:修正");
    }

    #[test]
    fn test_second_application_is_a_no_op() {
        for title in ["one:Issue title", "Issue title", "", "a:b:c", ":x"] {
            let once = rewrite_prefix(title, "helm");
            assert_eq!(rewrite_prefix(&once, "helm"), once, "title {:?}", title);
        }
    }
}
