#[test]
fn macro_expansions_compile() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/gedx_error_pass.rs");
    t.pass("tests/ui/model_type_pass.rs");
}
