use super::*;

#[test]
fn test_first_page_is_zero_on_the_wire() {
    let pairs = ListOptions::new(1, 25).query_pairs();
    assert_eq!(
        pairs,
        vec![("page", "0".to_string()), ("perPage", "25".to_string())]
    );
}

#[test]
fn test_later_pages_are_shifted_down() {
    let pairs = ListOptions::new(3, 10).query_pairs();
    assert_eq!(pairs[0], ("page", "2".to_string()));
}

/// Zero values mean "let the node decide" and are not sent at all.
#[test]
fn test_zero_values_are_omitted() {
    assert!(ListOptions::default().query_pairs().is_empty());
    assert_eq!(
        ListOptions::new(0, 5).query_pairs(),
        vec![("perPage", "5".to_string())]
    );
    assert_eq!(
        ListOptions::new(2, 0).query_pairs(),
        vec![("page", "1".to_string())]
    );
}
