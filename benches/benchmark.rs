//! Benchmarks for the page editor.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagesmith::page::{get_element_at_breakpoint, resolve_page_at_breakpoint};
use pagesmith::{
    Breakpoint, BreakpointOverride, Element, ElementType, Page, PageEditor, Section, SectionType,
};

/// Page with `sections` hero sections of ten elements each; every other
/// element carries tablet and mobile overrides.
fn build_page(sections: usize) -> Page {
    let mut page = Page::new("Benchmark");
    for s in 0..sections {
        let mut section = Section::new(format!("section-{}", s), SectionType::Hero);
        for e in 0..10 {
            let mut element = Element::new(format!("element-{}-{}", s, e), ElementType::Text)
                .with_content("text", "Hello world")
                .with_style("fontSize", 18);
            if e % 2 == 0 {
                let tablet = BreakpointOverride::default().with_style("fontSize", 16);
                let mobile = BreakpointOverride::default()
                    .with_content("text", "Hi")
                    .with_visible(e % 4 == 0);
                element.breakpoint_overrides = Some(
                    [(Breakpoint::Tablet, tablet), (Breakpoint::Mobile, mobile)]
                        .into_iter()
                        .collect(),
                );
            }
            section = section.with_element(element);
        }
        page = page.with_section(section);
    }
    page
}

fn bench_from_template(c: &mut Criterion) {
    c.bench_function("from_template", |b| {
        b.iter(|| black_box(PageEditor::from_template("landing").unwrap()))
    });
}

fn bench_element_at_breakpoint(c: &mut Criterion) {
    let page = build_page(1);
    let plain = page.sections[0].element("element-0-1").unwrap().clone();
    let overridden = page.sections[0].element("element-0-0").unwrap().clone();

    c.bench_function("element_at_breakpoint_desktop", |b| {
        b.iter(|| black_box(get_element_at_breakpoint(&overridden, Breakpoint::Desktop)))
    });
    c.bench_function("element_at_breakpoint_no_override", |b| {
        b.iter(|| black_box(get_element_at_breakpoint(&plain, Breakpoint::Mobile)))
    });
    c.bench_function("element_at_breakpoint_mobile", |b| {
        b.iter(|| black_box(get_element_at_breakpoint(&overridden, Breakpoint::Mobile)))
    });
}

fn bench_resolve_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_page");

    for num_sections in [1, 10, 50].iter() {
        let page = build_page(*num_sections);
        group.bench_with_input(
            BenchmarkId::new("sections", num_sections),
            num_sections,
            |b, _| b.iter(|| black_box(resolve_page_at_breakpoint(&page, Breakpoint::Mobile))),
        );
    }

    group.finish();
}

fn bench_move_element(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_element");

    for num_sections in [1, 10, 50].iter() {
        let mut editor = PageEditor::new(build_page(*num_sections));
        let mut x = 0.0;
        group.bench_with_input(
            BenchmarkId::new("sections", num_sections),
            num_sections,
            |b, _| {
                b.iter(|| {
                    x = (x + 1.0) % 100.0;
                    editor.move_element("section-0", "element-0-3", x, 50.0)
                })
            },
        );
    }

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo_redo");

    for num_sections in [1, 10, 50].iter() {
        let mut editor = PageEditor::new(build_page(*num_sections));
        for i in 0..20 {
            editor.move_element("section-0", "element-0-3", i as f64, 50.0);
        }
        group.bench_with_input(
            BenchmarkId::new("sections", num_sections),
            num_sections,
            |b, _| {
                b.iter(|| {
                    editor.undo();
                    editor.redo();
                })
            },
        );
    }

    group.finish();
}

fn bench_group_move(c: &mut Criterion) {
    c.bench_function("group_move", |b| {
        let mut editor = PageEditor::new(build_page(1));
        let ids: Vec<String> = (0..5).map(|e| format!("element-0-{}", e)).collect();
        let group = editor.group_elements(&ids).unwrap();
        let mut dx = 1.0;
        b.iter(|| {
            dx = -dx;
            editor.move_group(&group, dx, 0.0)
        })
    });
}

criterion_group!(
    benches,
    bench_from_template,
    bench_element_at_breakpoint,
    bench_resolve_page,
    bench_move_element,
    bench_undo_redo,
    bench_group_move,
);

criterion_main!(benches);
