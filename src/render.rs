use crate::aggregate::GroupedScreening;

const SITE_URL: &str = "https://drafthouse.com";

/// `kung-fu-panda-4` -> `Kung Fu Panda 4`. Only the first character of each
/// segment is touched.
pub fn kebab_to_title(slug: &str) -> String {
    slug.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn show_url(market: &str, slug: &str) -> String {
    format!("{SITE_URL}/{market}/show/{slug}")
}

fn format_days(screening: &GroupedScreening) -> String {
    screening
        .days
        .iter()
        .map(|day| format!("{} ({})", day.day_label, day.time_labels.join(", ")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn markdown_screening(screening: &GroupedScreening, market: &str) -> String {
    let slug = &screening.presentation_slug;
    format!(
        "    * [{}]({}): {}\n",
        kebab_to_title(slug),
        show_url(market, slug),
        format_days(screening)
    )
}

/// Markdown list for a changelog section. Empty when nothing changed, in
/// which case no section should be written.
pub fn render_markdown(titles: &[String], screenings: &[GroupedScreening], market: &str) -> String {
    let mut out = String::new();
    if !titles.is_empty() {
        out.push_str(&format!("* New movies: {}\n", titles.join(", ")));
    }
    if !screenings.is_empty() {
        out.push_str("* New screenings:\n");
        for screening in screenings {
            out.push_str(&markdown_screening(screening, market));
        }
    }
    out
}

pub fn render_plain_text(titles: &[String], screenings: &[GroupedScreening]) -> String {
    let mut out = String::new();
    if !titles.is_empty() {
        out.push_str(&format!("New movies: {}\n", titles.join(", ")));
    }
    if !screenings.is_empty() {
        out.push_str("New screenings:\n");
        for screening in screenings {
            out.push_str(&format!(
                "  {}: {}\n",
                kebab_to_title(&screening.presentation_slug),
                format_days(screening)
            ));
        }
    }
    out
}

/// Just the new titles, as one line or as a Markdown list.
pub fn render_title_list(titles: &[String], markdown: bool) -> String {
    if markdown {
        titles
            .iter()
            .map(|title| format!("    * {title}"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        titles.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DayScreenings;
    use pretty_assertions::assert_eq;

    fn screening(slug: &str, days: &[(&str, &[&str])]) -> GroupedScreening {
        GroupedScreening {
            presentation_slug: slug.into(),
            days: days
                .iter()
                .map(|(label, times)| DayScreenings {
                    day_label: (*label).into(),
                    time_labels: times.iter().map(|t| (*t).to_owned()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn title_case() {
        assert_eq!(kebab_to_title("kung-fu-panda-4"), "Kung Fu Panda 4");
        assert_eq!(kebab_to_title("dune"), "Dune");
        assert_eq!(kebab_to_title("mad-max-fURY-road"), "Mad Max FURY Road");
        assert_eq!(kebab_to_title("double--dash"), "Double  Dash");
        assert_eq!(kebab_to_title(""), "");
    }

    #[test]
    fn nothing_to_render() {
        assert_eq!(render_markdown(&[], &[], "raleigh"), "");
        assert_eq!(render_plain_text(&[], &[]), "");
    }

    #[test]
    fn titles_only() {
        let out = render_markdown(&["Dune".into()], &[], "raleigh");
        assert_eq!(out, "* New movies: Dune\n");
        assert!(!out.contains("New screenings"));
    }

    #[test]
    fn full_markdown() {
        let titles = vec!["Kung Fu Panda 4".to_owned(), "Alien".to_owned()];
        let screenings = vec![
            screening(
                "kung-fu-panda-4",
                &[("Tue 3/5", &["1:00pm", "6:30pm"]), ("Wed 3/6", &["4:00pm"])],
            ),
            screening("alien", &[("Fri 3/8", &["9:45pm"])]),
        ];
        assert_eq!(
            render_markdown(&titles, &screenings, "los-angeles"),
            "* New movies: Kung Fu Panda 4, Alien\n\
             * New screenings:\n\
             \x20   * [Kung Fu Panda 4](https://drafthouse.com/los-angeles/show/kung-fu-panda-4): Tue 3/5 (1:00pm, 6:30pm), Wed 3/6 (4:00pm)\n\
             \x20   * [Alien](https://drafthouse.com/los-angeles/show/alien): Fri 3/8 (9:45pm)\n"
        );
    }

    #[test]
    fn plain_text() {
        let screenings = vec![screening("alien", &[("Fri 3/8", &["9:45pm", "11:00pm"])])];
        assert_eq!(
            render_plain_text(&[], &screenings),
            "New screenings:\n  Alien: Fri 3/8 (9:45pm, 11:00pm)\n"
        );
    }

    #[test]
    fn title_list() {
        let titles = vec!["Alien".to_owned(), "Aliens".to_owned()];
        assert_eq!(render_title_list(&titles, false), "Alien, Aliens");
        assert_eq!(render_title_list(&titles, true), "    * Alien\n    * Aliens");
        assert_eq!(render_title_list(&[], true), "");
    }
}
