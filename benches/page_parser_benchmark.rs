//! Parsing and normalization throughput for a full advisors page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use deputies_advisors::domain::normalize;
use deputies_advisors::infrastructure::parsing::{AdvisorPageParser, HtmlParser};

fn full_page() -> String {
    let rows: String = (1..=20)
        .map(|i| format!("<tr><td>P-{i:02}</td><td><span>Advisor {i}</span></td><td>2020-01-{i:02}</td><td>Mesa</td></tr>"))
        .collect();
    let pages: String = (2..=6).map(|p| format!(r##"<li><a href="#">{p}</a></li>"##)).collect();

    format!(
        r##"<html><body>
             <select id="lotacao"><option value="">Selecione...</option><option value="178" selected>Alice</option></select>
             <table class="tabela-padrao-bootstrap"><tbody>{rows}</tbody></table>
             <ul class="pagination"><li class="current"><span>1</span></li>{pages}<li class="next"><a href="#">Próximo</a></li></ul>
           </body></html>"##
    )
}

fn parse_page(c: &mut Criterion) {
    let parser = AdvisorPageParser::new().unwrap();
    let html = full_page();

    c.bench_function("parse_advisors_page", |b| {
        b.iter(|| parser.parse(black_box(&html)).unwrap())
    });

    let page = parser.parse(&html).unwrap();
    c.bench_function("normalize_advisors_page", |b| {
        b.iter(|| normalize(black_box(&page.subject), black_box(&page.rows)))
    });
}

criterion_group!(benches, parse_page);
criterion_main!(benches);
