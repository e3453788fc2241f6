use html_test_support::assert_lines_eq;
use html_test_support::fixtures::load_cases;
use patch_compiler::{KeyDisplay, compile};

#[test]
fn fixture_programs_match() {
    let mut checked = 0usize;
    for case in load_cases() {
        let result = compile(case.input.as_str());
        match (&case.program, &case.error) {
            (Some(expected), None) => {
                let patch = result
                    .unwrap_or_else(|err| panic!("{}: unexpected compile error: {err}", case.name));
                assert_lines_eq(&case.name, expected, &patch.listing(KeyDisplay::MaskGenerated));
                checked += 1;
            }
            (None, Some(expected)) => {
                let err = result.expect_err(&case.name);
                assert_eq!(&err.to_string(), expected, "{}", case.name);
                checked += 1;
            }
            (None, None) => {}
            (Some(_), Some(_)) => unreachable!("rejected by the fixture loader"),
        }
    }
    assert!(checked > 0, "no fixture pins a program or an error");
}

#[test]
fn fixture_programs_compile_the_same_twice() {
    for case in load_cases() {
        let (Ok(first), Ok(second)) = (compile(case.input.as_str()), compile(case.input.as_str()))
        else {
            continue;
        };
        assert_eq!(
            first.listing(KeyDisplay::MaskGenerated),
            second.listing(KeyDisplay::MaskGenerated),
            "{}",
            case.name
        );
    }
}
