// Transformation compiler tests through the public API

use imagekit::transformation::{compile, parse, ParsedOption, ParsedStep};
use imagekit::{ImageKitError, LayerKind, Overlay, TransformationChain, TransformationStep};

fn codes(steps: &[ParsedStep]) -> Vec<Vec<(String, Option<String>)>> {
    steps
        .iter()
        .map(|step| {
            step.options
                .iter()
                .filter_map(|option| match option {
                    ParsedOption::Directive { code, value } => Some((code.clone(), value.clone())),
                    ParsedOption::Layer(_) => None,
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_compile_then_parse_preserves_order() {
    let chain = TransformationChain::new()
        .then(
            TransformationStep::new()
                .width(300)
                .height(200)
                .set("cropMode", "extract")
                .set("focus", "auto"),
        )
        .then(
            TransformationStep::new()
                .set("rotation", 90)
                .set("effectSharpen", 10)
                .set("progressive", true),
        );

    let compiled = compile(&chain).unwrap();
    assert_eq!(compiled, "w-300,h-200,cm-extract,fo-auto:rt-90,e-sharpen-10,pr");

    let parsed = parse(&compiled).unwrap();
    assert_eq!(
        codes(&parsed),
        vec![
            vec![
                ("w".to_string(), Some("300".to_string())),
                ("h".to_string(), Some("200".to_string())),
                ("cm".to_string(), Some("extract".to_string())),
                ("fo".to_string(), Some("auto".to_string())),
            ],
            vec![
                ("rt".to_string(), Some("90".to_string())),
                ("e-sharpen".to_string(), Some("10".to_string())),
                ("pr".to_string(), None),
            ],
        ]
    );
}

#[test]
fn test_flag_values() {
    let chain: TransformationChain = TransformationStep::new()
        .width(100)
        .set("progressive", true)
        .set("lossless", false)
        .into();
    assert_eq!(compile(&chain).unwrap(), "w-100,pr");
}

#[test]
fn test_delimiters_in_values_do_not_fragment() {
    let chain: TransformationChain = TransformationStep::new()
        .set("overlayText", "Sale: 50%, today @ 5/6")
        .width(10)
        .into();
    let compiled = compile(&chain).unwrap();

    let parsed = parse(&compiled).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(
        parsed[0].options,
        vec![
            ParsedOption::directive("ot", Some("Sale: 50%, today @ 5/6")),
            ParsedOption::directive("w", Some("10")),
        ]
    );
}

#[test]
fn test_unknown_key_passes_through() {
    let chain: TransformationChain = TransformationStep::new().set("xyz", "abc").into();
    assert_eq!(compile(&chain).unwrap(), "xyz-abc");
}

#[test]
fn test_overlay_round_trip() {
    let overlay = Overlay::new(LayerKind::Text)
        .with_input("Hello, world")
        .with_transformation(TransformationStep::new().set("fontSize", 20));
    let chain: TransformationChain = TransformationStep::new().width(400).overlay(overlay).into();

    let compiled = compile(&chain).unwrap();
    let parsed = parse(&compiled).unwrap();

    match &parsed[0].options[1] {
        ParsedOption::Layer(layer) => {
            assert_eq!(layer.kind, "text");
            assert_eq!(layer.input.as_deref(), Some("Hello, world"));
            assert_eq!(layer.steps.len(), 1);
        }
        other => panic!("expected a layer, got {:?}", other),
    }
}

#[test]
fn test_overlay_nesting_limit() {
    let mut overlay = Overlay::image("base.png");
    for _ in 0..9 {
        overlay = Overlay::image("nested.png")
            .with_transformation(TransformationStep::new().overlay(overlay));
    }
    let chain: TransformationChain = TransformationStep::new().overlay(overlay).into();

    assert!(matches!(compile(&chain), Err(ImageKitError::Usage(_))));
}

#[test]
fn test_chain_display() {
    let chain: TransformationChain = vec![
        TransformationStep::new().height(300),
        TransformationStep::new().set("rotation", 90),
    ]
    .into();
    assert_eq!(chain.to_string(), "h-300:rt-90");
}
