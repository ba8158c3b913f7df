use super::PrintChild;

/// Renders `children` as branches under the current line.
///
/// Trailing `None` children are dropped; the last remaining child gets the
/// closing `└─` branch and every nested line is prefixed with `tab`.
pub fn print_tree(tab: Option<&str>, children: &[Option<&PrintChild<'_>>]) -> String {
    let tab = tab.unwrap_or("");
    let mut out = String::new();
    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, render) in children[..=last].iter().enumerate() {
        let Some(render) = render else {
            continue;
        };
        let is_last = i == last;
        let nested_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let line = render(&nested_tab);

        out.push('\n');
        out.push_str(tab);
        match (line.is_empty(), is_last) {
            (true, _) => out.push('│'),
            (false, true) => out.push_str("└─ "),
            (false, false) => out.push_str("├─ "),
        }
        out.push_str(&line);
    }
    out
}
