//! Shared fixtures: portal-shaped HTML and output file readers.

#![allow(dead_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use deputies_advisors::domain::FIELD_NAMES;

/// Directory page listing `subjects` after the "Selecione" prompt.
pub fn directory_html(subjects: &[(&str, &str)]) -> String {
    let options: String = subjects
        .iter()
        .map(|(id, name)| format!(r#"<option value="{id}">{name}</option>"#))
        .collect();

    format!(
        r#"<html><body><form>
             <select id="lotacao" name="lotacao">
               <option value="">Selecione...</option>{options}
             </select>
           </form></body></html>"#
    )
}

/// Advisors page `current` of `total` for subject `id`, with `rows` as table cells.
pub fn advisors_html(id: &str, name: &str, current: u32, total: u32, rows: &[&[&str]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();

    format!(
        r#"<html><body>
             <select id="lotacao" name="lotacao">
               <option value="">Selecione...</option>
               <option value="{id}" selected="selected">{name}</option>
             </select>
             <table class="tabela-padrao-bootstrap">
               <thead><tr><th>Ponto</th><th>Nome</th><th>Data</th><th>Ato</th></tr></thead>
               <tbody>{body}</tbody>
             </table>
             {pagination}
           </body></html>"#,
        pagination = pagination_html(current, total)
    )
}

fn pagination_html(current: u32, total: u32) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut items = String::new();
    if current > 1 {
        items.push_str(r##"<li class="previous"><a href="#">Anterior</a></li>"##);
    }
    for page in 1..=total {
        if page == current {
            items.push_str(&format!(r#"<li class="current"><span>{page}</span></li>"#));
        } else {
            items.push_str(&format!(r##"<li><a href="#">{page}</a></li>"##));
        }
    }
    if current < total {
        items.push_str(r##"<li class="next"><a href="#">Próximo</a></li>"##);
    }

    format!(r#"<ul class="pagination">{items}</ul>"#)
}

/// Decoded output file content, whether xz or plain.
pub fn read_output(path: &Path) -> String {
    let mut content = String::new();
    if path.extension().is_some_and(|ext| ext == "xz") {
        xz2::read::XzDecoder::new_multi_decoder(File::open(path).unwrap())
            .read_to_string(&mut content)
            .unwrap();
    } else {
        File::open(path).unwrap().read_to_string(&mut content).unwrap();
    }
    content
}

/// Data rows of the output file, with the per-batch header lines removed.
pub fn read_records(path: &Path) -> Vec<Vec<String>> {
    let content = read_output(path);
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content.as_bytes())
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect::<Vec<_>>())
        .filter(|row| row != &FIELD_NAMES)
        .collect()
}

/// Number of header lines, i.e. number of appended batches.
pub fn count_headers(path: &Path) -> usize {
    let header = FIELD_NAMES.map(|f| format!("\"{f}\"")).join(",");
    read_output(path).lines().filter(|line| *line == header).count()
}
