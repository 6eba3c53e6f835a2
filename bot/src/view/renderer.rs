//! View renderer
//!
//! Renders a tournament's roster and premade grouping into an ordered set
//! of pages: one main page, a run of roster pages and a run of group
//! pages. Rendering is a pure function of its inputs; navigation links
//! are resolved against the identifiers persisted by the *previous*
//! synchronization pass, so a page may link to a message that was created
//! one pass earlier.

use std::collections::HashMap;

use crate::domain::entities::{
    ButtonStyle, Control, MemberStatus, MergedGroup, Page, PageField, Participant, ParticipantId,
    SelectOption, Tournament, ViewState, DEFAULT_RATING, FIELD_BUDGET, GROUP_BLOCKS_PER_PAGE,
    PAGE_BUDGET,
};

/// Premade selection controls are only offered from this roster size on
const MIN_PARTICIPANTS: usize = 2;

const SELECT_CHUNK: usize = 25;
const LABEL_MAX: usize = 25;
const DESCRIPTION_MAX: usize = 50;

/// The full rendered view of one tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub main: Page,
    pub roster: Vec<Page>,
    pub groups: Vec<Page>,
}

/// Render the complete view. Output order is stable: main page, roster
/// pages, group pages.
pub fn render_view(
    tournament: &Tournament,
    participants: &[Participant],
    grouping: &[MergedGroup],
    prev: &ViewState,
) -> RenderedView {
    RenderedView {
        main: render_main_page(tournament, participants, prev),
        roster: render_roster_pages(tournament, participants),
        groups: render_group_pages(tournament, participants, grouping, prev),
    }
}

/// The main page: summary, join/leave controls, and links into the first
/// roster page and the first group page once their identifiers are known.
pub fn render_main_page(
    tournament: &Tournament,
    participants: &[Participant],
    prev: &ViewState,
) -> Page {
    let mut page = Page::new(
        tournament.name.clone(),
        tournament.description.clone().unwrap_or_default(),
    );
    page.fields.push(PageField::new(
        "Region:",
        format!("**{}**", tournament.region.to_string().to_uppercase()),
    ));
    page.fields.push(PageField::new(
        "Participants info:",
        format!(
            "Amount: {}\nAverage rating: {}",
            participants.len(),
            average_rating(participants)
        ),
    ));

    page.controls.push(Control::Button {
        custom_id: format!("join_tournament#{}", tournament.id),
        label: "Join Tournament".to_string(),
        style: ButtonStyle::Primary,
    });
    page.controls.push(Control::Button {
        custom_id: format!("leave_tournament#{}", tournament.id),
        label: "Leave Tournament".to_string(),
        style: ButtonStyle::Danger,
    });
    if let Some(first) = prev.roster_pages.first() {
        page.controls.push(Control::NavLink {
            label: "Participants list".to_string(),
            target: first.clone(),
        });
    }
    if let Some(first) = prev.group_pages.first() {
        page.controls.push(Control::NavLink {
            label: "Premade groups".to_string(),
            target: first.clone(),
        });
    }
    page
}

/// Roster pages: participant mentions accumulated into fields of at most
/// [`FIELD_BUDGET`] characters on pages of at most [`PAGE_BUDGET`]
/// characters. An empty roster renders no pages.
pub fn render_roster_pages(tournament: &Tournament, participants: &[Participant]) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::new();
    if participants.is_empty() {
        return pages;
    }

    let mut field_counter = 1usize;
    let mut page = roster_page(tournament, 1);
    let mut field = next_roster_field(&mut field_counter);

    for participant in participants {
        let entry = roster_entry(tournament, participant);
        let open = field.name.len() + field.value.len();
        if page.len() + open + entry.len() > PAGE_BUDGET {
            let full_field = std::mem::replace(&mut field, next_roster_field(&mut field_counter));
            page.fields.push(full_field);
            let next_number = pages.len() + 2;
            let full_page = std::mem::replace(&mut page, roster_page(tournament, next_number));
            pages.push(full_page);
        } else if field.value.len() + entry.len() > FIELD_BUDGET {
            let full_field = std::mem::replace(&mut field, next_roster_field(&mut field_counter));
            page.fields.push(full_field);
        }
        field.value.push_str(&entry);
    }
    page.fields.push(field);
    pages.push(page);
    pages
}

fn roster_page(tournament: &Tournament, number: usize) -> Page {
    Page::new(
        format!("{} - Participants {}", tournament.name, number),
        "The participants of the tournament.",
    )
}

fn next_roster_field(counter: &mut usize) -> PageField {
    let field = PageField::new(format!("Participants: {}", counter), String::new());
    *counter += 1;
    field
}

fn roster_entry(tournament: &Tournament, participant: &Participant) -> String {
    let mention = mention(participant);
    match participant.primary_rating() {
        Some((region, record)) if region == tournament.region => {
            format!(" {}({})", mention, record.rating)
        }
        Some((region, record)) => {
            let regional = participant
                .rating_in(tournament.region)
                .map(|r| r.rating)
                .unwrap_or(0);
            format!(
                " {}({}: {} | {}: {})",
                mention,
                region.to_string().to_uppercase(),
                record.rating,
                tournament.region.to_string().to_uppercase(),
                regional
            )
        }
        None => format!(" {}(Estimated: {})", mention, DEFAULT_RATING),
    }
}

/// Group pages: a legend page carrying the premade-selection controls,
/// followed by listing pages holding at most [`GROUP_BLOCKS_PER_PAGE`]
/// cluster blocks each, chained with forward/backward navigation links.
pub fn render_group_pages(
    tournament: &Tournament,
    participants: &[Participant],
    grouping: &[MergedGroup],
    prev: &ViewState,
) -> Vec<Page> {
    let by_id: HashMap<ParticipantId, &Participant> =
        participants.iter().map(|p| (p.id, p)).collect();
    let overall = average_rating(participants);

    let mut pages = vec![legend_page(tournament, participants, grouping)];

    // listing pages with the 1-based block range each one holds
    let mut listing: Vec<Page> = Vec::new();
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (index, group) in grouping.iter().enumerate() {
        let block = group_block(index, group, &by_id, overall);
        let needs_new = match listing.last() {
            None => true,
            Some(page) => {
                page.fields.len() >= GROUP_BLOCKS_PER_PAGE
                    || page.len() + block.name.len() + block.value.len() > PAGE_BUDGET
            }
        };
        if needs_new {
            listing.push(listing_page(tournament, listing.len() + 1));
            ranges.push((index + 1, index + 1));
        }
        if let Some(page) = listing.last_mut() {
            page.fields.push(block);
        }
        if let Some(range) = ranges.last_mut() {
            range.1 = index + 1;
        }
    }
    pages.extend(listing);

    attach_group_navigation(&mut pages, &ranges, prev);
    pages
}

fn attach_group_navigation(pages: &mut [Page], ranges: &[(usize, usize)], prev: &ViewState) {
    let total = pages.len();
    for index in 0..total {
        // backward link, only between listing pages
        if index >= 2 {
            if let Some(target) = prev.group_pages.get(index - 1) {
                let (from, to) = ranges[index - 2];
                pages[index].controls.push(Control::NavLink {
                    label: format!("Groups {} - {}", from, to),
                    target: target.clone(),
                });
            }
        }
        // forward link, from the legend and between listing pages
        if index + 1 < total {
            if let Some(target) = prev.group_pages.get(index + 1) {
                let (from, to) = ranges[index];
                pages[index].controls.push(Control::NavLink {
                    label: format!("Groups {} - {}", from, to),
                    target: target.clone(),
                });
            }
        }
    }
}

fn legend_page(
    tournament: &Tournament,
    participants: &[Participant],
    grouping: &[MergedGroup],
) -> Page {
    let mut page = Page::new(
        format!("{} - Premade groups", tournament.name),
        "Groups of players who want to play in one team.",
    );

    if participants.len() >= MIN_PARTICIPANTS && !grouping.is_empty() {
        page.fields.push(PageField::new(
            format!("{} Accepted", MemberStatus::Ready.marker()),
            "Player accepted this group by selecting one or more of the other players as premades.",
        ));
        page.fields.push(PageField::new(
            format!("{} Pending", MemberStatus::Pending.marker()),
            "Player still needs to accept the group by choosing at least one of its players as a premade.",
        ));
        page.fields.push(PageField::new(
            format!("{} Incomplete", MemberStatus::Incomplete.marker()),
            "Not all of the player's selected premades are in this group.",
        ));
        page.fields.push(PageField::new(
            format!("{} Conflict", MemberStatus::Conflict.marker()),
            "None of the player's selected premades are in this group.",
        ));
    }

    page.controls
        .extend(select_controls(tournament, participants));
    page.controls.push(Control::Button {
        custom_id: format!("leave_groups#{}", tournament.id),
        label: "Reset my premade selection".to_string(),
        style: ButtonStyle::Secondary,
    });
    page
}

fn select_controls(tournament: &Tournament, participants: &[Participant]) -> Vec<Control> {
    if participants.len() < MIN_PARTICIPANTS {
        return vec![Control::Select {
            custom_id: format!("group_select#{}", tournament.id),
            placeholder: "Not enough participants to select premades...".to_string(),
            options: vec![SelectOption {
                label: "Player".to_string(),
                description: String::new(),
                value: "0".to_string(),
            }],
            min_values: 1,
            max_values: 1,
            disabled: true,
        }];
    }

    let mut options: Vec<SelectOption> = participants
        .iter()
        .map(|participant| {
            let description = match participant.rating_in(tournament.region) {
                Some(record) => format!(
                    "{}#{} | {}",
                    record.display_name, record.tag, record.tier_name
                ),
                None => "Unlinked".to_string(),
            };
            SelectOption {
                label: truncate(&participant.display_name, LABEL_MAX),
                description: truncate(&description, DESCRIPTION_MAX),
                value: participant.platform_id.clone(),
            }
        })
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label));

    let chunk_count = options.len().div_ceil(SELECT_CHUNK);
    options
        .chunks(SELECT_CHUNK)
        .enumerate()
        .map(|(i, chunk)| {
            let mut placeholder = "Select premades".to_string();
            if chunk_count > 1 {
                let first = prefix(&chunk[0].label);
                placeholder.push_str(&format!(": {}", first));
                if chunk.len() > 1 {
                    let last = prefix(&chunk[chunk.len() - 1].label);
                    placeholder.push_str(&format!(" - {}", last));
                }
            }
            Control::Select {
                custom_id: format!("group_select#{}_{}", tournament.id, i),
                placeholder,
                options: chunk.to_vec(),
                min_values: 1,
                max_values: chunk.len() as u8,
                disabled: false,
            }
        })
        .collect()
}

fn group_block(
    index: usize,
    group: &MergedGroup,
    by_id: &HashMap<ParticipantId, &Participant>,
    overall_average: i32,
) -> PageField {
    let accepted: Vec<_> = group
        .members
        .iter()
        .filter(|m| m.status == MemberStatus::Ready)
        .collect();
    let others: Vec<_> = group
        .members
        .iter()
        .filter(|m| m.status != MemberStatus::Ready)
        .collect();

    let mut lines: Vec<String> = Vec::new();
    if !accepted.is_empty() {
        let sum: i64 = accepted
            .iter()
            .map(|m| effective_rating_of(&m.participant, by_id) as i64)
            .sum();
        let average = ceil_div(sum, accepted.len() as i64) as i32;
        let deviation = (average - overall_average).abs();
        let direction = if average >= overall_average {
            "Above"
        } else {
            "Below"
        };
        lines.push(format!(
            "Average rating of accepted players: **{}** ({} {} average)",
            average, deviation, direction
        ));
        let mentions: Vec<String> = accepted
            .iter()
            .map(|m| {
                format!(
                    "{}({})",
                    mention_of(&m.participant, by_id),
                    effective_rating_of(&m.participant, by_id)
                )
            })
            .collect();
        lines.push(format!(
            "{} {}",
            MemberStatus::Ready.marker(),
            mentions.join(", ")
        ));
    }
    if !others.is_empty() {
        let mentions: Vec<String> = others
            .iter()
            .map(|m| format!("{} {}", m.status.marker(), mention_of(&m.participant, by_id)))
            .collect();
        lines.push(mentions.join(", "));
    }

    PageField::new(
        format!("Group {} - {} players", index + 1, group.len()),
        lines.join("\n"),
    )
}

fn listing_page(tournament: &Tournament, number: usize) -> Page {
    Page::new(
        format!("{} - Premade groups {}", tournament.name, number),
        String::new(),
    )
}

fn mention(participant: &Participant) -> String {
    format!("<@{}>", participant.platform_id)
}

fn mention_of(id: &ParticipantId, by_id: &HashMap<ParticipantId, &Participant>) -> String {
    match by_id.get(id) {
        Some(participant) => mention(participant),
        // declarations may briefly reference a participant who already left
        None => format!("`{}`", id),
    }
}

fn effective_rating_of(id: &ParticipantId, by_id: &HashMap<ParticipantId, &Participant>) -> i32 {
    by_id
        .get(id)
        .map(|p| p.effective_rating())
        .unwrap_or(DEFAULT_RATING)
}

/// Average effective rating across the roster, rounded up; 0 for an
/// empty roster.
fn average_rating(participants: &[Participant]) -> i32 {
    if participants.is_empty() {
        return 0;
    }
    let sum: i64 = participants
        .iter()
        .map(|p| p.effective_rating() as i64)
        .sum();
    ceil_div(sum, participants.len() as i64) as i32
}

fn ceil_div(sum: i64, count: i64) -> i64 {
    (sum + count - 1) / count
}

/// Truncate to at most `max_len` characters, ellipsis included.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_len.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn prefix(label: &str) -> String {
    label.chars().take(2).collect::<String>().to_uppercase()
}
