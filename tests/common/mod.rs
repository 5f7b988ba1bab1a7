//! Shared test constants and helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;

use bibmark::bibtex::parse_bibtex;
use bibmark::Bibliography;
use tempfile::NamedTempFile;

/// BibTeX database used across suites.
///
/// - `Albert1989`: proceedings with pages, the canonical APA example
/// - `abril2007`: ACM journal article with volume, number, month, pages and DOI
/// - `qiskit2024`: untyped (`misc`) arXiv preprint with a primary class
/// - `kosiur2001`: book with edition, publisher and address
/// - `rustblog`: web page with `howpublished` and `url`
pub const SAMPLE_BIB: &str = r#"
@string{fst = "Foundations of Software Technology and Theoretical Computer Science"}

@inproceedings{Albert1989,
  author    = {Luc Albert},
  title     = {Average Case Complexity Analysis of the {RETE} Multi-Pattern Match Algorithm},
  booktitle = fst,
  publisher = {Springer},
  year      = 1989,
  pages     = {223--241}
}

@article{abril2007,
  author  = {Abril, Patricia S. and Plant, Robert},
  title   = {The patent holder's dilemma: Buy, sell, or troll?},
  journal = {Commun. ACM},
  volume  = {50},
  number  = {1},
  month   = {January},
  year    = {2007},
  pages   = {36--44},
  doi     = {10.1145/1188913.1188915}
}

@misc{qiskit2024,
  author        = {Ali Javadi-Abhari and Matthew Treinish},
  title         = {Quantum computing with {Q}iskit},
  year          = {2024},
  eprint        = {2405.08810},
  archivePrefix = {arXiv},
  primaryClass  = {quant-ph}
}

@book{kosiur2001,
  author    = {David Kosiur},
  title     = {Understanding Policy-Based Networking},
  edition   = {2nd.},
  publisher = {Wiley},
  address   = {New York, NY},
  year      = {2001}
}

@misc{rustblog,
  author       = {{The Rust Team}},
  title        = {Announcing Rust 1.0},
  howpublished = {Rust Blog},
  url          = {https://blog.rust-lang.org/2015/05/15/Rust-1.0.html},
  month        = {May},
  year         = {2015}
}
"#;

/// The same Albert1989 record as a JSON array snapshot.
pub const ALBERT_JSON: &str = r#"[
  {
    "key": "Albert1989",
    "type": "inproceedings",
    "author": [{"first": "Luc", "last": "Albert"}],
    "title": "Average Case Complexity Analysis of the RETE Multi-Pattern Match Algorithm",
    "booktitle": "Foundations of Software Technology and Theoretical Computer Science",
    "publisher": "Springer",
    "year": 1989,
    "pages": "223--241"
  }
]"#;

/// APA rendering of `@Albert1989` inside a paragraph.
pub const ALBERT_APA: &str = concat!(
    r#"<span class="citation-key">Albert, 1989</span>"#,
    r#"<span class="citation-full"><span class="author">Albert Luc</span> (1989). "#,
    r#"<span class="title">Average Case Complexity Analysis of the RETE Multi-Pattern Match Algorithm</span>. "#,
    r#"In <span class="booktitle">Foundations of Software Technology and Theoretical Computer Science</span> "#,
    r#"(pp. <span class="pages">223--241</span>).</span>"#,
);

/// Parses [`SAMPLE_BIB`].
pub fn sample_bibliography() -> Bibliography {
    Bibliography::from_records(parse_bibtex(SAMPLE_BIB).unwrap())
}

/// Helper to create a temporary file with content
pub fn create_temp_file(content: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
