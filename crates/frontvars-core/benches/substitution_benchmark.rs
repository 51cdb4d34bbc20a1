use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frontvars_core::dom::{Element, Node};
use frontvars_core::{
    Dictionary, DictionaryResolver, LiveDecorationEngine, SettingsHandle, StaticRenderer,
    TextSnapshot, TokenPattern,
};

struct Fixed(Dictionary);

impl DictionaryResolver for Fixed {
    fn resolve(&self, _document_id: &str) -> Option<Dictionary> {
        Some(self.0.clone())
    }
}

fn dictionary() -> Dictionary {
    Dictionary::new()
        .with("use-var", true)
        .with("name", "Alice")
        .with("project", "Frontvars")
        .with("version", 3)
}

fn document() -> String {
    let line = "Dear {name}, welcome to {project} v{version}. Your id is {id}.\n";
    line.repeat(200)
}

fn benchmark_token_matching(c: &mut Criterion) {
    let pattern = TokenPattern::new("{([^}]+)}").unwrap();
    let text = document();

    c.bench_function("match_200_lines", |b| {
        b.iter(|| pattern.matches_by_line(black_box(&text)).count())
    });
}

fn benchmark_live_build(c: &mut Criterion) {
    let engine = LiveDecorationEngine::new(SettingsHandle::default(), Fixed(dictionary()));
    let text = document();
    let view = TextSnapshot::new(text.clone())
        .with_document("doc.md")
        .with_viewport(4000..6000)
        .with_cursor(5000);

    c.bench_function("live_build_viewport", |b| b.iter(|| engine.build(black_box(&view))));
}

fn benchmark_static_pass(c: &mut Criterion) {
    let renderer = StaticRenderer::new(SettingsHandle::default(), Fixed(dictionary()));
    let mut root = Element::new("div");
    for _ in 0..50 {
        let paragraph = Element::new("p").with_text("Hi {name}, this is {project} ({missing}).");
        root = root.with_child(paragraph);
    }
    let root: Node = root.into();

    c.bench_function("static_pass_50_paragraphs", |b| {
        b.iter(|| {
            let mut tree = root.clone();
            renderer.apply(black_box(&mut tree), "doc.md")
        })
    });
}

criterion_group!(benches, benchmark_token_matching, benchmark_live_build, benchmark_static_pass);
criterion_main!(benches);
