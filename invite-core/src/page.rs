//! Static HTML rendering of the invitation page.

use crate::calendar::{CalendarTarget, google_url, ics_filename, outlook_url, yahoo_url};
use crate::error::InviteResult;
use crate::invitation::Invitation;
use crate::rsvp::MESSAGE_MAX_LEN;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The complete page. The `.ics` download link points at
/// [`ics_filename`], which the caller is expected to write alongside.
pub fn render_page(invitation: &Invitation) -> InviteResult<String> {
    let title = escape_html(&invitation.full_title);
    let header = render_header(invitation);
    let content = render_content(invitation)?;
    let footer = render_footer(invitation);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
</head>
<body>
{header}
{content}
{footer}
</body>
</html>
"#
    ))
}

fn render_header(invitation: &Invitation) -> String {
    let venue = escape_html(&invitation.venue.short_name);
    let website = invitation
        .venue
        .website
        .as_deref()
        .map(|w| format!("\n  <p class=\"website\">{}</p>", escape_html(w)))
        .unwrap_or_default();

    format!(
        r#"<header>
  <div aria-hidden="true">🎨✨🌀⭐🎉</div>
  <h1>You're Invited to a Party</h1>
  <h2>at {venue}!</h2>{website}
</header>"#
    )
}

fn detail_card(icon: &str, heading: &str, body: &str) -> String {
    format!(
        r#"    <div class="card">
      <span class="icon">{icon}</span>
      <h4>{heading}</h4>
      {body}
    </div>"#
    )
}

fn render_content(invitation: &Invitation) -> InviteResult<String> {
    let venue = &invitation.venue;
    let times = &invitation.times;

    let activities = if invitation.activities.is_empty() {
        "<p>Birthday fun and more!</p>".to_string()
    } else {
        let items: Vec<String> = invitation
            .activities
            .iter()
            .map(|a| format!("<li>{}</li>", escape_html(a)))
            .collect();
        format!("<ul>{}</ul>", items.join(""))
    };

    let mut cards = vec![
        detail_card(
            "🗓️",
            "Date",
            &format!("<p>{}</p>", escape_html(times.short_date())),
        ),
        detail_card(
            "⏰",
            "Time",
            &format!("<p>{}</p>", escape_html(times.time_range())),
        ),
        detail_card(
            "📍",
            "Location",
            &format!(
                r#"<p><a href="{}">{}</a></p><p>{}</p>"#,
                escape_html(&venue.maps_url()),
                escape_html(&venue.name),
                escape_html(&venue.address())
            ),
        ),
        detail_card("🎨", "Activities", &activities),
    ];
    if let Some(parking) = &venue.parking {
        cards.push(detail_card(
            "🅿️",
            "Parking",
            &format!("<p>{}</p>", escape_html(parking)),
        ));
    }

    let calendar = render_calendar_links(invitation)?;
    let rsvp_form = render_rsvp_form(invitation);
    let contact = render_contact(invitation);

    Ok(format!(
        r#"<main>
  <section class="intro">
    <p>Join us for a fun-filled celebration for</p>
    <h3>{guest}!</h3>
  </section>
  <section class="details">
{cards}
  </section>
{calendar}
  <section class="rsvp">
    <h4>🎉 Please RSVP by {deadline}</h4>
    <p>Help us plan the perfect party! Let us know if you can join the celebration.</p>
{rsvp_form}
  </section>
{contact}
</main>"#,
        guest = escape_html(&invitation.guest_name),
        cards = cards.join("\n"),
        deadline = escape_html(invitation.rsvp_deadline.month_day()),
    ))
}

fn render_calendar_links(invitation: &Invitation) -> InviteResult<String> {
    let mut items = Vec::new();

    for target in CalendarTarget::ALL {
        let href = match target {
            CalendarTarget::Apple | CalendarTarget::ICal => ics_filename(invitation),
            CalendarTarget::Google => google_url(invitation)?,
            CalendarTarget::Microsoft365 | CalendarTarget::OutlookCom => {
                outlook_url(invitation, target)?
            }
            CalendarTarget::Yahoo => yahoo_url(invitation)?,
        };

        let extra = if target.is_file() {
            " download"
        } else {
            r#" target="_blank" rel="noopener noreferrer""#
        };

        items.push(format!(
            r#"      <li><a href="{}"{}>{}</a></li>"#,
            escape_html(&href),
            extra,
            target.label()
        ));
    }

    Ok(format!(
        r#"  <section class="calendar">
    <h4>Add to Calendar</h4>
    <ul>
{}
    </ul>
  </section>"#,
        items.join("\n")
    ))
}

fn render_rsvp_form(invitation: &Invitation) -> String {
    let dietary: Vec<String> = invitation
        .dietary
        .options()
        .iter()
        .map(|o| {
            format!(
                r#"        <label><input type="checkbox" name="dietary" value="{}"> {}</label>"#,
                escape_html(&o.value),
                escape_html(&o.label)
            )
        })
        .collect();

    format!(
        r#"    <form class="rsvp-form" method="post">
      <label>Name <input type="text" name="name" minlength="2" maxlength="50" required></label>
      <label>Email <input type="email" name="email" required></label>
      <fieldset>
        <legend>Will you attend?</legend>
        <label><input type="radio" name="attending" value="yes" checked> Yes</label>
        <label><input type="radio" name="attending" value="no"> No</label>
      </fieldset>
      <label>Number of guests <input type="number" name="guests" min="1" max="{max_guests}" value="1"></label>
      <fieldset>
        <legend>Dietary requirements</legend>
{dietary}
      </fieldset>
      <label>Message <textarea name="message" maxlength="{max_message}"></textarea></label>
      <button type="submit">RSVP Now</button>
    </form>"#,
        max_guests = invitation.max_guests,
        dietary = dietary.join("\n"),
        max_message = MESSAGE_MAX_LEN,
    )
}

fn render_contact(invitation: &Invitation) -> String {
    let venue = &invitation.venue;
    let mut parts = Vec::new();

    if let (Some(url), Some(website)) = (venue.website_url(), venue.website.as_deref()) {
        parts.push(format!(
            r#"Visit <a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            escape_html(&url),
            escape_html(website)
        ));
    }
    if let (Some(link), Some(phone)) = (venue.phone_link(), venue.phone.as_deref()) {
        parts.push(format!(
            r#"call <a href="{}">{}</a>"#,
            escape_html(&link),
            escape_html(phone)
        ));
    }

    if parts.is_empty() {
        return String::new();
    }

    format!(
        r#"  <section class="contact">
    <p>Questions? {}</p>
  </section>"#,
        parts.join(" or ")
    )
}

fn render_footer(invitation: &Invitation) -> String {
    let venue = &invitation.venue;
    let phone = venue
        .phone
        .as_deref()
        .map(|p| format!("\n  <p>Tel. {}</p>", escape_html(p)))
        .unwrap_or_default();
    let parking = venue
        .parking
        .as_deref()
        .map(|p| format!("\n  <p class=\"parking\">{}</p>", escape_html(p)))
        .unwrap_or_default();

    format!(
        r#"<footer>
  <h4>{business}</h4>
  <p>{street} • {locality}</p>{phone}{parking}
</footer>"#,
        business = escape_html(&venue.business_name),
        street = escape_html(&venue.street),
        locality = escape_html(&venue.locality()),
    )
}
