//! Clover XML report parser

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

use crate::model::{ClassCoverage, CoverageCounts, FileCoverage, PackageCoverage, ProjectCoverage};

/// Parse a clover.xml report file
///
/// `base_dir` is the build's workspace directory; source paths recorded under
/// it come back relative to it.
pub fn parse(path: &Path, base_dir: &str) -> Result<ProjectCoverage> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;
    parse_string(&content, base_dir)
}

/// Parse Clover XML content from a string
pub fn parse_string(content: &str, base_dir: &str) -> Result<ProjectCoverage> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut state = ParserState {
        base_dir,
        project: ProjectCoverage {
            name: String::new(),
            counts: None,
            packages: Vec::new(),
            owner: None,
        },
        current_package: None,
        current_file: None,
        current_class: None,
    };

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => state.open(e),
            Ok(Event::Empty(ref e)) => {
                // Self-closing element: open and close in one step
                state.open(e);
                state.close(e.name().as_ref());
            }
            Ok(Event::End(ref e)) => state.close(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("Error parsing Clover XML: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(state.project)
}

struct ParserState<'a> {
    base_dir: &'a str,
    project: ProjectCoverage,
    current_package: Option<PackageCoverage>,
    current_file: Option<FileCoverage>,
    current_class: Option<ClassCoverage>,
}

impl ParserState<'_> {
    fn open(&mut self, e: &BytesStart) {
        match e.name().as_ref() {
            b"project" => {
                if let Some(name) = attr(e, b"name") {
                    self.project.name = name;
                }
            }
            b"package" => {
                self.current_package = Some(PackageCoverage {
                    name: attr(e, b"name").unwrap_or_default(),
                    counts: None,
                    files: Vec::new(),
                });
            }
            b"file" => {
                let name = attr(e, b"name").unwrap_or_default();
                let path = attr(e, b"path").unwrap_or_else(|| name.clone());
                self.current_file = Some(FileCoverage {
                    name,
                    path: relativize(&path, self.base_dir),
                    counts: None,
                    classes: Vec::new(),
                });
            }
            b"class" => {
                self.current_class = Some(ClassCoverage {
                    name: attr(e, b"name").unwrap_or_default(),
                    counts: CoverageCounts::default(),
                });
            }
            b"metrics" => {
                // Assign the block to the innermost open node
                let counts = parse_counts(e);
                if let Some(class) = self.current_class.as_mut() {
                    class.counts = counts;
                } else if let Some(file) = self.current_file.as_mut() {
                    file.counts = Some(counts);
                } else if let Some(package) = self.current_package.as_mut() {
                    package.counts = Some(counts);
                } else {
                    self.project.counts = Some(counts);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: &[u8]) {
        match tag {
            b"class" => {
                if let (Some(class), Some(file)) =
                    (self.current_class.take(), self.current_file.as_mut())
                {
                    file.classes.push(class);
                }
            }
            b"file" => {
                if let (Some(file), Some(package)) =
                    (self.current_file.take(), self.current_package.as_mut())
                {
                    package.files.push(file);
                }
            }
            b"package" => {
                if let Some(package) = self.current_package.take() {
                    self.project.packages.push(package);
                }
            }
            _ => {}
        }
    }
}

/// Read one attribute as an owned string
fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Extract the aggregated counters from a `<metrics>` element
fn parse_counts(e: &BytesStart) -> CoverageCounts {
    let mut counts = CoverageCounts::default();

    for attr in e.attributes().filter_map(|a| a.ok()) {
        let value = String::from_utf8_lossy(&attr.value);
        let Ok(n) = value.parse::<u32>() else {
            continue;
        };
        match attr.key.as_ref() {
            b"packages" => counts.packages = n,
            b"files" => counts.files = n,
            b"classes" => counts.classes = n,
            b"loc" => counts.loc = n,
            b"ncloc" => counts.ncloc = n,
            b"methods" => counts.methods = n,
            b"coveredmethods" => counts.covered_methods = n,
            b"conditionals" => counts.conditionals = n,
            b"coveredconditionals" => counts.covered_conditionals = n,
            b"statements" => counts.statements = n,
            b"coveredstatements" => counts.covered_statements = n,
            b"elements" => counts.elements = n,
            b"coveredelements" => counts.covered_elements = n,
            _ => {}
        }
    }

    counts
}

/// Strip the base directory prefix from a recorded source path
fn relativize(path: &str, base_dir: &str) -> String {
    match path.strip_prefix(base_dir) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::CoverageMetric;
    use std::io::Write;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<coverage generated="1187121723701" clover="1.3.13">
    <project name="demo" timestamp="1187121693801">
        <metrics packages="1" files="1" classes="1" loc="120" ncloc="90"
                 methods="10" coveredmethods="9"
                 conditionals="10" coveredconditionals="5"
                 statements="10" coveredstatements="6"
                 elements="30" coveredelements="20"/>
        <package name="com.example">
            <metrics files="1" classes="1" methods="10" coveredmethods="9"
                     conditionals="10" coveredconditionals="5"
                     statements="10" coveredstatements="6"
                     elements="30" coveredelements="20"/>
            <file name="Foo.java" path="/workspace/src/Foo.java">
                <metrics classes="1" methods="10" coveredmethods="9"
                         conditionals="10" coveredconditionals="5"
                         statements="10" coveredstatements="6"
                         elements="30" coveredelements="20"/>
                <class name="com.example.Foo">
                    <metrics methods="10" coveredmethods="9"
                             conditionals="10" coveredconditionals="5"
                             statements="10" coveredstatements="6"
                             elements="30" coveredelements="20"/>
                </class>
                <line num="12" type="method" count="3"/>
                <line num="14" type="stmt" count="3"/>
            </file>
        </package>
    </project>
</coverage>"#;

    #[test]
    fn test_parse_sample() {
        let project = parse_string(SAMPLE, "/workspace/").unwrap();

        assert_eq!(project.name, "demo");
        assert_eq!(project.packages.len(), 1);
        assert_eq!(project.ratio(CoverageMetric::Method).to_string(), "9/10");
        assert_eq!(project.ratio(CoverageMetric::Statement).to_string(), "6/10");
        assert!((project.ratio(CoverageMetric::Element).percentage() - 66.666).abs() < 0.01);

        let class = project.find_class_coverage("com.example.Foo").unwrap();
        assert_eq!(class.counts.covered_methods, 9);
    }

    #[test]
    fn test_self_closing_elements() {
        let xml = r#"<coverage>
    <project name="empty">
        <metrics methods="4" coveredmethods="2"/>
        <package name="com.example"/>
    </project>
</coverage>"#;

        let project = parse_string(xml, "/").unwrap();
        assert_eq!(project.packages.len(), 1);
        assert!(project.find_package_coverage("com.example").is_some());
        assert_eq!(project.ratio(CoverageMetric::Method).to_string(), "2/4");
    }

    #[test]
    fn test_source_paths_relative_to_base_dir() {
        let project = parse_string(SAMPLE, "/workspace/").unwrap();
        let file = project.find_file_coverage("Foo.java").unwrap();
        assert_eq!(file.path, "src/Foo.java");
    }

    #[test]
    fn test_paths_outside_base_dir_untouched() {
        let project = parse_string(SAMPLE, "/elsewhere/").unwrap();
        let file = project.find_file_coverage("Foo.java").unwrap();
        assert_eq!(file.path, "/workspace/src/Foo.java");
    }

    #[test]
    fn test_parse_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(SAMPLE.as_bytes()).unwrap();

        let project = parse(tmp.path(), "/workspace/").unwrap();
        assert_eq!(project.name, "demo");
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(parse(Path::new("/no/such/clover.xml"), "/").is_err());
    }

    #[test]
    fn test_malformed_xml_errors() {
        assert!(parse_string("<coverage><project></coverage>", "/").is_err());
    }
}
