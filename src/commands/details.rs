use anyhow::Result;
use invite_core::Invitation;
use owo_colors::OwoColorize;

use crate::render::field;

pub fn run(invitation: &Invitation) -> Result<()> {
    let times = &invitation.times;
    let venue = &invitation.venue;

    println!("🎉 {}", invitation.full_title.bold());
    println!();
    println!("{}", field("Guest", &invitation.guest_name));
    println!("{}", field("Date", times.full_date()));
    println!("{}", field("Short date", times.short_date()));
    println!("{}", field("Time", times.time_range()));
    println!("{}", field("Start (24h)", times.start_time24()));
    println!("{}", field("End (24h)", times.end_time24()));
    println!("{}", field("Start", times.start_iso()));
    println!("{}", field("End", times.end_iso()));
    println!("{}", field("Date (ISO)", times.date_iso()));
    println!("{}", field("Timezone", times.timezone().name()));
    println!("{}", field("Duration", format!("{} min", times.duration_minutes())));
    println!();
    println!("{}", field("Venue", &venue.name));
    println!("{}", field("Address", venue.address()));
    println!("{}", field("Map", venue.maps_url()));
    if let Some(phone) = &venue.phone {
        println!("{}", field("Phone", phone));
    }
    if let Some(url) = venue.website_url() {
        println!("{}", field("Website", url));
    }
    if let Some(parking) = &venue.parking {
        println!("{}", field("Parking", parking));
    }
    println!();
    println!(
        "{}",
        field("RSVP by", invitation.rsvp_deadline.long_date())
    );
    println!("{}", field("Deadline", invitation.rsvp_deadline.iso()));
    println!("{}", field("Max guests", invitation.max_guests));

    if !invitation.activities.is_empty() {
        println!();
        println!("{}", "Activities".dimmed());
        for activity in &invitation.activities {
            println!("   {}", activity);
        }
    }

    Ok(())
}
