//! The skill name list that travels next to a table, one name per line in
//! record order.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable(Vec<String>);

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on LF or CRLF. A single trailing line break does not add an
    /// empty entry; blank lines elsewhere are kept as empty names.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.is_empty() {
            return Self::new();
        }
        let body = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);
        Self(
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
        )
    }

    /// One name per line, LF terminated.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for name in &self.0 {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    /// Index of the first name that would not survive a trip through
    /// [`Self::to_text`] and [`Self::parse`] as a single line.
    pub fn first_line_break(&self) -> Option<usize> {
        self.0
            .iter()
            .position(|name| name.contains(['\n', '\r']))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }
}

impl From<Vec<String>> for NameTable {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl FromIterator<String> for NameTable {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lf_and_crlf() {
        let names = NameTable::parse("Attack\r\nDefend\nFlee\r\n");
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["Attack", "Defend", "Flee"]);
    }

    #[test]
    fn keeps_inner_blank_lines() {
        let names = NameTable::parse("A\n\nC\n");
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(1), Some(""));
    }

    #[test]
    fn final_line_without_break_is_kept() {
        assert_eq!(NameTable::parse("A\nB").len(), 2);
        assert!(NameTable::parse("").is_empty());
        assert_eq!(NameTable::parse("\n").iter().collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn finds_names_that_span_lines() {
        let names = NameTable::from(vec!["A".to_string(), "B\r\nC".to_string()]);
        assert_eq!(names.first_line_break(), Some(1));
        assert_eq!(NameTable::parse("A\nB\n").first_line_break(), None);
    }

    #[test]
    fn text_round_trip() {
        let names = NameTable::from(vec!["Cleave".to_string(), "Quick Draw".to_string()]);
        assert_eq!(names.to_text(), "Cleave\nQuick Draw\n");
        assert_eq!(NameTable::parse(&names.to_text()), names);
    }
}
