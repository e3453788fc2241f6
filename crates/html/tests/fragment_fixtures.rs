use html::debug::outline;
use html::parse_fragment;
use html_test_support::fixtures::load_cases;
use html_test_support::{assert_lines_eq, outline_of};

#[test]
fn fixture_outlines_match() {
    let mut checked = 0usize;
    for case in load_cases() {
        let Some(expected) = &case.outline else {
            continue;
        };
        let tree = parse_fragment(&case.input);
        let actual = outline(&tree, usize::MAX);
        assert_lines_eq(&case.name, expected, &actual);
        assert_eq!(actual, outline_of(&case.input));
        checked += 1;
    }
    assert!(checked > 0, "no fixture pins an outline");
}
