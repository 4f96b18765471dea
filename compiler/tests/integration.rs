use compiler::{CompilerConfig, compile, read_show, read_show_from, read_show_with};
use sly::{Color, ErrorBundle, Justification, Lexer, Parser, Recovered, Show, SlyError, Stage, Style};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn compile_with(source: &str, config: &CompilerConfig) -> Result<Show, Recovered<Show>> {
    let tokens = Lexer::new(source).lex().expect("lexing failed");
    let statements = Parser::new(tokens).parse().expect("parsing failed");
    compile(&statements, config)
}

fn show(source: &str) -> Show {
    match compile_with(source, &CompilerConfig::default()) {
        Ok(show) => show,
        Err(failure) => panic!("compilation failed:\n{}", failure.errors),
    }
}

fn failure(source: &str) -> Recovered<Show> {
    match compile_with(source, &CompilerConfig::default()) {
        Ok(show) => panic!("expected compilation errors, got {:?}", show),
        Err(failure) => failure,
    }
}

fn messages(errors: &ErrorBundle) -> Vec<&str> {
    errors.iter().map(|e| e.message.as_str()).collect()
}

fn diagnostics(source: &str) -> ErrorBundle {
    match read_show(source) {
        Ok(show) => panic!("expected errors, got {:?}", show),
        Err(SlyError::Diagnostics(bundle)) => bundle,
        Err(other) => panic!("expected diagnostics, got {}", other),
    }
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[test]
fn single_empty_slide() {
    let show = show("slide a {}");
    assert_eq!(show.slides.len(), 1);
    assert_eq!(show.slides[0].background, Color::WHITE);
    assert!(show.slides[0].blocks.is_empty());
}

#[test]
fn empty_source() {
    assert!(read_show("").unwrap().slides.is_empty());
    assert!(read_show("# nothing here\n").unwrap().slides.is_empty());
}

#[test]
fn blocks_start_with_default_style() {
    let show = show("slide a { block b { ---text--- } }");
    let block = &show.slides[0].blocks[0];
    assert_eq!(block.text, "text");
    assert_eq!(block.style, Style::default());
}

#[test]
fn slides_and_blocks_keep_source_order() {
    let show = show(
        "slide one { block a { ---1a--- } block b { ---1b--- } }\n\
         slide two { block c { ---2c--- } }",
    );
    let texts: Vec<Vec<&str>> = show
        .slides
        .iter()
        .map(|s| s.blocks.iter().map(|b| b.text.as_str()).collect())
        .collect();
    assert_eq!(texts, vec![vec!["1a", "1b"], vec!["2c"]]);
}

#[test]
fn later_text_replaces_earlier() {
    let show = show("slide a { block b { ---first--- ---second--- } }");
    assert_eq!(show.slides[0].blocks[0].text, "second");
}

#[test]
fn red_slide_with_text() {
    let show = read_show("slide s { self.backgroundColor = \"red\"; block b { ---Hi--- } }").unwrap();
    assert_eq!(show.slides.len(), 1);
    assert_eq!(show.slides[0].background, Color::rgba(255, 0, 0, 255));
    assert_eq!(show.slides[0].blocks.len(), 1);
    assert_eq!(show.slides[0].blocks[0].text, "Hi");
}

#[test]
fn nesting_rules() {
    let errors = failure(
        "block b {}\n\
         slide a {\n\
           slide c {}\n\
           ---loose---\n\
           block d { block e {} }\n\
         }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec![
            "A block may only be defined within a slide",
            "A slide may only be defined at the top level",
            "Text may only be defined within a block",
            "A block may only be defined within a slide",
        ]
    );
    let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 3, 4, 5]);
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[test]
fn color_literal_alpha() {
    let show = show(
        "slide a { self.backgroundColor = (1, 2, 3); }\n\
         slide b { self.backgroundColor = (1, 2, 3, 4,); }",
    );
    assert_eq!(show.slides[0].background, Color::rgba(1, 2, 3, 255));
    assert_eq!(show.slides[1].background, Color::rgba(1, 2, 3, 4));
}

#[test]
fn block_attributes() {
    let show = show(
        "slide a {\n\
           block b {\n\
             self.font = \"Fira Code\";\n\
             self.fontSize = 32;\n\
             self.fontColor = (10, 20, 30);\n\
             self.justify = \"center\";\n\
           }\n\
         }",
    );
    let style = &show.slides[0].blocks[0].style;
    assert_eq!(style.font, "Fira Code");
    assert_eq!(style.size, 32);
    assert_eq!(style.color, Color::rgb(10, 20, 30));
    assert_eq!(style.justification, Justification::Center);
}

#[test]
fn font_size_must_be_integer() {
    let errors = diagnostics("slide a { block b { self.fontSize = \"big\"; } }");
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.stage, Some(Stage::Compilation));
    assert_eq!(error.message, "fontSize attribute must be an integer, but was String");
}

#[test]
fn attribute_type_errors() {
    let errors = failure(
        "slide a {\n\
           self.backgroundColor = 5;\n\
           block b {\n\
             self.font = 3;\n\
             self.fontColor = \"purple\";\n\
             self.justify = \"middle\";\n\
             self.justify = 1;\n\
           }\n\
         }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec![
            "backgroundColor attribute must be either a color tuple or a color name, but was Integer",
            "font attribute must be a string, but was Integer",
            "Unsupported color 'purple'",
            "justify attribute must be either 'left', 'right', or 'center'",
            "justify attribute must be either 'left', 'right', or 'center'",
        ]
    );
}

#[test]
fn misplaced_attributes() {
    let errors = failure(
        "self.fontSize = 10;\n\
         slide a {\n\
           self.fontColor = \"red\";\n\
           block b { self.backgroundColor = \"red\"; }\n\
         }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec![
            "fontSize attribute is only available for blocks",
            "fontColor attribute is only available for blocks",
            "backgroundColor attribute is only available for slides",
        ]
    );
}

#[test]
fn misplaced_attribute_leaves_target_untouched() {
    let failure = failure(
        "slide a {\n\
           self.fontColor = \"red\";\n\
           block b { self.backgroundColor = (1, 2, 3); ---b--- }\n\
         }",
    );
    assert_eq!(
        messages(&failure.errors),
        vec![
            "fontColor attribute is only available for blocks",
            "backgroundColor attribute is only available for slides",
        ]
    );
    let slide = &failure.partial.slides[0];
    assert_eq!(slide.background, Color::WHITE);
    assert_eq!(slide.blocks[0].style, Style::default());
    assert_eq!(slide.blocks[0].text, "b");
}

#[test]
fn unknown_attribute() {
    let errors = failure("slide a { self.border = 1; }").errors;
    assert_eq!(messages(&errors), vec!["Unrecognized attribute 'border'"]);
    assert_eq!(
        errors.to_string(),
        "[line=1] Compilation Error at 's': Unrecognized attribute 'border'"
    );
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

#[test]
fn shadowing_does_not_leak() {
    let show = show(
        "mut x = \"red\";\n\
         slide a {\n\
           let x = \"blue\";\n\
           block b { self.fontColor = x; }\n\
         }\n\
         slide c {\n\
           block d { self.fontColor = x; }\n\
         }",
    );
    assert_eq!(show.slides[0].blocks[0].style.color, Color::BLUE);
    assert_eq!(show.slides[1].blocks[0].style.color, Color::RED);
}

#[test]
fn mutable_reassignment() {
    let show = show(
        "mut size = 10;\n\
         size = 20;\n\
         slide a {\n\
           block b { self.fontSize = size; }\n\
           size = 30;\n\
           block c { self.fontSize = size; }\n\
         }\n\
         slide d { block e { self.fontSize = size; } }",
    );
    assert_eq!(show.slides[0].blocks[0].style.size, 20);
    assert_eq!(show.slides[0].blocks[1].style.size, 30);
    // The assignment inside slide a wrote through to the file scope binding
    assert_eq!(show.slides[1].blocks[0].style.size, 30);
}

#[test]
fn references_copy_values() {
    let show = show(
        "mut a = (1, 2, 3);\n\
         let b = a;\n\
         a = \"green\";\n\
         slide s { self.backgroundColor = b; }",
    );
    assert_eq!(show.slides[0].background, Color::rgb(1, 2, 3));
}

#[test]
fn immutable_assignment_keeps_partial_show() {
    let failure = failure(
        "let x = \"red\";\n\
         slide a {\n\
           self.backgroundColor = x;\n\
           x = \"blue\";\n\
         }",
    );
    assert_eq!(failure.errors.len(), 1);
    let error = failure.errors.iter().next().unwrap();
    assert_eq!(error.line, 4);
    assert!(error.message.contains("immutable"), "{}", error);
    assert!(error.message.contains("line 1"), "{}", error);

    assert_eq!(failure.partial.slides.len(), 1);
    assert_eq!(failure.partial.slides[0].background, Color::RED);
}

#[test]
fn variable_errors() {
    let errors = failure(
        "let a = 1;\n\
         let a = 2;\n\
         b = 3;\n\
         let c = missing;\n\
         slide s { let a = 4; }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec![
            "variable 'a' already declared in this scope",
            "cannot assign to undeclared variable 'b'",
            "variable 'missing' must be initialized before dereference",
        ]
    );
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

#[test]
fn macro_applies_to_caller() {
    let show = show(
        "macro blue() { self.fontColor = \"blue\"; }\n\
         slide a {\n\
           block one { $blue(); ---one--- }\n\
           block two { ---two--- }\n\
           block three { $blue(); ---three--- }\n\
         }",
    );
    let colors: Vec<Color> = show.slides[0].blocks.iter().map(|b| b.style.color).collect();
    assert_eq!(colors, vec![Color::BLUE, Color::BLACK, Color::BLUE]);
}

#[test]
fn macro_declares_into_caller_scope() {
    let show = show(
        "macro sizes() { let big = 40; }\n\
         slide a {\n\
           $sizes();\n\
           block b { self.fontSize = big; }\n\
         }",
    );
    assert_eq!(show.slides[0].blocks[0].style.size, 40);
}

#[test]
fn macro_can_emit_slides_and_call_macros() {
    let show = show(
        "macro red() { self.backgroundColor = \"red\"; }\n\
         macro page() { slide p { $red(); block b { ---generated--- } } }\n\
         $page();\n\
         $page();",
    );
    assert_eq!(show.slides.len(), 2);
    assert!(show.slides.iter().all(|s| s.background == Color::RED));
    assert_eq!(show.slides[1].blocks[0].text, "generated");
}

#[test]
fn macro_errors() {
    let errors = failure(
        "$later();\n\
         macro later() {}\n\
         macro later() {}\n\
         slide a { macro local() {} }\n\
         slide b { $local(); }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec![
            "macro 'later' must be defined before use",
            "macro 'later' already declared in this scope",
            "macro 'local' must be defined before use",
        ]
    );
    let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 3, 5]);
}

#[test]
fn errors_inside_macro_bodies_are_reported() {
    let errors = failure(
        "macro broken() { self.fontSize = \"x\"; self.fontColor = \"red\"; }\n\
         slide a { block b { $broken(); } }",
    );
    assert_eq!(
        messages(&errors.errors),
        vec!["fontSize attribute must be an integer, but was String"]
    );
    assert_eq!(errors.errors.iter().next().unwrap().line, 1);
    assert_eq!(errors.partial.slides[0].blocks[0].style.color, Color::RED);
}

#[test]
fn recursive_macro_hits_depth_limit() {
    let config = CompilerConfig {
        max_macro_depth: Some(8),
    };
    let failure = compile_with(
        "macro forever() { $forever(); }\nslide a { $forever(); }",
        &config,
    )
    .unwrap_err();
    assert_eq!(
        messages(&failure.errors),
        vec!["macro expansion exceeded maximum depth of 8"]
    );
    assert_eq!(failure.partial.slides.len(), 1);
}

#[test]
fn depth_limit_allows_shallow_nesting() {
    let config = CompilerConfig {
        max_macro_depth: Some(2),
    };
    let source = "macro inner() { self.fontSize = 20; }\n\
                  macro outer() { $inner(); }\n\
                  slide a { block b { $outer(); } }";
    let show = read_show_with(source, &config).unwrap();
    assert_eq!(show.slides[0].blocks[0].style.size, 20);

    let config = CompilerConfig {
        max_macro_depth: Some(1),
    };
    assert!(read_show_with(source, &config).is_err());
}

// ---------------------------------------------------------------------------
// Inheritance
// ---------------------------------------------------------------------------

#[test]
fn slide_inheritance() {
    let show = show(
        "slide base { self.backgroundColor = \"blue\"; block b { ---base--- } }\n\
         slide child : base { }\n\
         slide override : base { self.backgroundColor = \"green\"; }",
    );
    assert_eq!(show.slides[1].background, Color::BLUE);
    assert!(show.slides[1].blocks.is_empty());
    assert_eq!(show.slides[2].background, Color::GREEN);
    assert_eq!(show.slides[0].background, Color::BLUE);
}

#[test]
fn block_inheritance_copies_style_only() {
    let show = show(
        "slide a {\n\
           block title { self.fontSize = 40; self.justify = \"center\"; ---Title--- }\n\
           block subtitle : title { self.fontSize = 24; }\n\
         }",
    );
    let subtitle = &show.slides[0].blocks[1];
    assert_eq!(subtitle.text, "");
    assert_eq!(subtitle.style.size, 24);
    assert_eq!(subtitle.style.justification, Justification::Center);
    assert_eq!(show.slides[0].blocks[0].style.size, 40);
}

#[test]
fn block_parent_must_be_visible() {
    let errors = failure(
        "slide a { block title { self.fontSize = 40; } }\n\
         slide b { block sub : title { } }",
    )
    .errors;
    assert_eq!(
        messages(&errors),
        vec!["Cannot inherit from an undefined block 'title'"]
    );
}

#[test]
fn undefined_parent_slide() {
    let failure = failure("slide child : base { }\nslide base { }");
    assert_eq!(
        messages(&failure.errors),
        vec!["Cannot inherit from an undefined slide 'base'"]
    );
    assert_eq!(failure.partial.slides.len(), 1);
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_stops_at_first_failing_stage() {
    let errors = diagnostics("slide a { self.nope = 1; }\n%");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().unwrap().stage, Some(Stage::Lexing));

    let errors = diagnostics("slide a { self.nope = 1; }\nlet = 2;");
    assert!(errors.iter().all(|e| e.stage == Some(Stage::Parsing)));
}

#[test]
fn collects_every_compilation_error() {
    let errors = diagnostics(
        "slide a { self.one = 1; }\n\
         slide b { self.two = 2; }\n\
         slide c { self.three = 3; }",
    );
    let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn reads_from_stream() {
    let source = b"slide a { block b { ---streamed--- } }";
    let show = read_show_from(&source[..], &CompilerConfig::default()).unwrap();
    assert_eq!(show.slides[0].blocks[0].text, "streamed");
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let source: &[u8] = &[0x73, 0xff, 0xfe];
    let error = read_show_from(source, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(error, SlyError::Io(_)));
    assert!(error.diagnostics().is_none());
}

#[test]
fn simple_presentation() {
    let source = r#"
# Fonts and colors shared across the deck
let titleFont = "Helvetica";
mut accent = (30, 60, 90);

macro title() {
    self.font = titleFont;
    self.fontSize = 36;
    self.justify = "center";
}

slide intro {
    self.backgroundColor = "black";

    block heading {
        $title();
        self.fontColor = "white";
        ---Welcome---
    }

    block body {
        self.fontColor = accent;
        ---
Default
Text
---
    }
}

accent = "red";

slide outro : intro {
    block heading {
        $title();
        self.fontColor = accent;
        ---Thanks---
    }
}
"#;

    let show = read_show(source).unwrap();
    assert_eq!(show.slides.len(), 2);

    let intro = &show.slides[0];
    assert_eq!(intro.background, Color::BLACK);
    assert_eq!(intro.blocks.len(), 2);
    assert_eq!(intro.blocks[0].text, "Welcome");
    assert_eq!(intro.blocks[0].style.font, "Helvetica");
    assert_eq!(intro.blocks[0].style.size, 36);
    assert_eq!(intro.blocks[0].style.color, Color::WHITE);
    assert_eq!(intro.blocks[0].style.justification, Justification::Center);
    assert_eq!(intro.blocks[1].text, "\nDefault\nText\n");
    assert_eq!(intro.blocks[1].style.color, Color::rgb(30, 60, 90));
    assert_eq!(intro.blocks[1].style.font, "Times New Roman");

    let outro = &show.slides[1];
    assert_eq!(outro.background, Color::BLACK);
    assert_eq!(outro.blocks.len(), 1);
    assert_eq!(outro.blocks[0].style.color, Color::RED);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_from_toml() {
    let config = CompilerConfig::from_toml_str("max_macro_depth = 4").unwrap();
    assert_eq!(config.max_macro_depth, Some(4));

    let config = CompilerConfig::from_toml_str("").unwrap();
    assert_eq!(config, CompilerConfig::default());
    assert_eq!(config.max_macro_depth, Some(256));

    assert!(CompilerConfig::from_toml_str("max_macro_depth = \"deep\"").is_err());
    assert_eq!(CompilerConfig::unbounded().max_macro_depth, None);
}
