use divan::{Bencher, black_box};
use htmlgen::{Content, Document, Element, Node, RenderOptions, tags};

fn main() {
    divan::main();
}

/// A document with `rows` table rows of mixed text, raw and attribute content.
fn build_document(rows: usize) -> Document {
    let mut doc = Document::html5();
    let mut table = tags::table().attr("class", "report").unwrap();
    for i in 0..rows {
        let mut tr = tags::tr();
        tr.attrs.set_data("row", i as i64).unwrap();
        tr.append(Element::with_content(&tags::TD, [Content::text(format!("item <{i}>"))]).unwrap())
            .unwrap();
        tr.append(
            Element::with_content(&tags::TD, [Content::raw("<em>raw</em>")])
                .unwrap()
                .attr("title", "A & B")
                .unwrap(),
        )
        .unwrap();
        let mut cell = tags::td();
        cell.append(tags::input().attr("checked", i % 2 == 0).unwrap())
            .unwrap();
        tr.append(cell).unwrap();
        table.append(tr).unwrap();
    }
    if let Some(body) = doc.body_mut() {
        body.append(table).unwrap();
    }
    doc
}

#[divan::bench(args = [10, 100, 1000])]
fn render_table(bencher: Bencher, rows: usize) {
    let doc = build_document(rows);
    bencher.bench_local(|| {
        let html = black_box(&doc).to_html();
        black_box(html);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn render_table_html5_void(bencher: Bencher, rows: usize) {
    let doc = build_document(rows);
    let opts = RenderOptions::new().html5_void();
    bencher.bench_local(|| {
        let html = black_box(&doc).to_html_with_options(&opts);
        black_box(html);
    });
}

#[divan::bench]
fn render_escape_heavy_text(bencher: Bencher) {
    let text = "<script>alert('x') && \"y\"</script>".repeat(256);
    let node = Node::text(text);
    bencher.bench_local(|| {
        let html = black_box(&node).to_html();
        black_box(html);
    });
}

#[divan::bench(args = [100, 1000])]
fn build_table(bencher: Bencher, rows: usize) {
    bencher.bench_local(|| {
        let doc = build_document(black_box(rows));
        black_box(doc);
    });
}
