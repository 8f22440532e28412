//! Integration tests for the HTML tokenizer.

use epic_html::{HTMLTokenizer, Token, TokenizeError};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input.as_bytes()).into_tokens()
}

/// Helper to render every token back to HTML and concatenate the result
fn render(input: &str) -> String {
    tokenize(input).iter().map(ToString::to_string).collect()
}

fn text(data: &str) -> Token {
    Token::Text {
        data: data.to_string(),
    }
}

#[test]
fn test_empty_input() {
    assert!(tokenize("").is_empty());
}

#[test]
fn test_plain_text_is_one_token() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens, vec![text("Hello")]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(
        tokens,
        vec![Token::Doctype {
            data: "html".to_string()
        }]
    );
    assert_eq!(tokens[0].to_string(), "<!DOCTYPE html>");
}

#[test]
fn test_nameless_doctype_renders_without_space() {
    assert_eq!(render("<!DOCTYPE>"), "<!DOCTYPE>");
    assert_eq!(render("<!doctype"), "<!DOCTYPE>");
}

#[test]
fn test_lowercase_doctype_keeps_legacy_identifiers() {
    let input = r#"<!doctype html PUBLIC "-//W3C//DTD HTML 4.01//EN">"#;
    match &tokenize(input)[0] {
        Token::Doctype { data } => {
            assert_eq!(data, r#"html PUBLIC "-//W3C//DTD HTML 4.01//EN""#);
        }
        other => panic!("Expected Doctype token, got {other:?}"),
    }
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::StartTag { name, attributes } => {
            assert_eq!(name, "div");
            assert!(attributes.is_empty());
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<HEAD></Template>");
    assert_eq!(tokens[0].tag_name(), Some("head"));
    assert_eq!(tokens[1].tag_name(), Some("template"));
    assert!(tokens[1].is_end_tag());
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::SelfClosingTag { name, .. } => assert_eq!(name, "br"),
        other => panic!("Expected SelfClosingTag token, got {other:?}"),
    }
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(
        tokens,
        vec![Token::Comment {
            data: " hello ".to_string()
        }]
    );
}

#[test]
fn test_bogus_comment_from_question_mark() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data.starts_with("?xml")));
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<div a="1" b='2' c=3>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            let pairs: Vec<(&str, &str)> = attributes
                .iter()
                .map(|attr| (attr.name.as_str(), attr.value.as_str()))
                .collect();
            assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("c", "3")]);
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_boolean_attribute() {
    let tokens = tokenize("<input disabled>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "disabled");
            assert_eq!(attributes[0].value, "");
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<a href="/one" href="/two">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "/one");
        }
        other => panic!("Expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1], text("Hi"));
}

#[test]
fn test_character_references_pass_through() {
    let tokens = tokenize("a &amp; b &nbsp;");
    assert_eq!(tokens, vec![text("a &amp; b &nbsp;")]);
}

#[test]
fn test_style_element_rawtext() {
    let tokens = tokenize("<style>p > a { color: red }</style>");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1], text("p > a { color: red }"));
    assert!(tokens[2].is_end_tag());
}

#[test]
fn test_script_with_fake_tags() {
    let tokens = tokenize("<script>if (a<b) { x = '</div>'; }</script>");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1], text("if (a<b) { x = '</div>'; }"));
}

#[test]
fn test_raw_text_end_tag_is_case_insensitive() {
    let tokens = tokenize("<title>A</TITLE>after");
    assert_eq!(tokens[1], text("A"));
    assert_eq!(tokens[2].tag_name(), Some("title"));
    assert_eq!(tokens[3], text("after"));
}

#[test]
fn test_template_is_not_raw_text() {
    let tokens = tokenize("<template><b>x</b></template>");
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[1].tag_name(), Some("b"));
}

#[test]
fn test_plaintext_swallows_rest_of_input() {
    let tokens = tokenize("<plaintext></plaintext><b>");
    assert_eq!(tokens[1], text("</plaintext><b>"));
}

#[test]
fn test_lone_less_than_at_eof_is_text() {
    assert_eq!(tokenize("a <"), vec![text("a <")]);
    assert_eq!(tokenize("a </"), vec![text("a </")]);
}

#[test]
fn test_unfinished_tag_at_eof_is_dropped() {
    assert_eq!(tokenize("ok<div class="), vec![text("ok")]);
}

#[test]
fn test_unterminated_comment_is_emitted() {
    let tokens = tokenize("<!-- open");
    assert_eq!(
        tokens,
        vec![Token::Comment {
            data: " open".to_string()
        }]
    );
}

#[test]
fn test_render_reconstructs_canonical_markup() {
    let input = "<!DOCTYPE html><p class=\"intro\" hidden>Hi <b>there</b><br/><!--c--></p>";
    assert_eq!(render(input), input);
}

#[test]
fn test_render_normalizes_quotes_and_case() {
    assert_eq!(render("<P CLASS='x'>y</P>"), r#"<p class="x">y</p>"#);
}

#[test]
fn test_invalid_utf8_yields_error_after_valid_prefix() {
    let tokens = HTMLTokenizer::new(b"<p>ok\xFF rest</p>").into_tokens();
    assert_eq!(
        tokens,
        vec![
            Token::StartTag {
                name: "p".to_string(),
                attributes: Vec::new(),
            },
            text("ok"),
            Token::Error(TokenizeError::InvalidUtf8 { offset: 5 }),
        ]
    );
}

#[test]
fn test_invalid_utf8_inside_tag_discards_tag() {
    let tokens = HTMLTokenizer::new(b"x<di\xC3v>").into_tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], text("x"));
    assert!(matches!(tokens[1], Token::Error(_)));
}

#[test]
fn test_invalid_utf8_inside_raw_text_end_tag_keeps_text() {
    let script = Token::StartTag {
        name: "script".to_string(),
        attributes: Vec::new(),
    };
    let cases: [(&[u8], &str); 3] = [
        (&b"<script>a<\xC3"[..], "a<"),
        (&b"<script>a</\xC3"[..], "a</"),
        (&b"<script>a</scR\xC3"[..], "a</scR"),
    ];
    for (input, expected) in cases {
        let tokens = HTMLTokenizer::new(input).into_tokens();
        assert_eq!(tokens.len(), 3, "{tokens:?}");
        assert_eq!(tokens[0], script);
        assert_eq!(tokens[1], text(expected));
        assert!(matches!(tokens[2], Token::Error(_)));
    }
}

#[test]
fn test_iteration_ends_after_error() {
    let mut tokenizer = HTMLTokenizer::new(b"\x80");
    assert!(matches!(tokenizer.next(), Some(Token::Error(_))));
    assert_eq!(tokenizer.next(), None);
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn test_multibyte_text() {
    assert_eq!(tokenize("<p>héllo ✓</p>")[1], text("héllo ✓"));
}
