use quote::{format_ident, quote};

/// Expands to one `#[test]` per `.lox` fixture under `bin/tests/fixtures`,
/// each handing the fixture's source to `expect_fixture`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/../fixtures", env!("CARGO_MANIFEST_DIR"));
    let mut fixtures = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .peekable();

    assert!(fixtures.peek().is_some(), "No .lox fixtures found in {root_dir}");

    let tests = fixtures.map(|entry| {
        let fixture_path = entry.path().to_string_lossy().to_string();
        let relative_path = entry.path().strip_prefix(&root_dir).unwrap().to_string_lossy();
        let test_ident = format_ident!(
            "fixture_{}",
            relative_path.replace(['/', '-'], "_").trim_end_matches(".lox")
        );
        quote! {
            #[test]
            fn #test_ident() {
                expect_fixture(std::fs::read_to_string(#fixture_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
