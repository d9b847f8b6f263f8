//! Booking summary rendering shared by text mode and the TUI.

use crate::model::BookingSummary;

/// Human-readable summary, one line per entry.
pub struct SummaryLines {
    pub lines: Vec<String>,
}

pub fn build_booking_summary(summary: &BookingSummary) -> SummaryLines {
    let mut lines = Vec::new();
    lines.push("Booking summary".to_string());
    lines.push(String::new());
    lines.push(format!("  Vehicle type:   {}", summary.vehicle_type));
    lines.push(format!("  Service:        {}", summary.service));
    lines.push(format!("  Cost:           {:.2} €", summary.price));
    lines.push(format!("  Car wash:       {}", summary.car_wash));
    lines.push(format!("  Address:        {}", summary.address));
    lines.push(format!("  Scheduled for:  {} at {}", summary.date, summary.time));
    lines.push(String::new());
    lines.push(if summary.saved_to_history {
        "  Reservation saved to your booking history.".to_string()
    } else {
        "  Reservation not saved to history.".to_string()
    });
    SummaryLines { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BookingSummary {
        BookingSummary {
            vehicle_type: "SUV".into(),
            service: "Εξωτερικό πλύσιμο".into(),
            price: 8.0,
            car_wash: "Sparkle Wash".into(),
            address: "Main St 1, Athens".into(),
            date: "2025-06-01".into(),
            time: "14:30".into(),
            saved_to_history: true,
        }
    }

    #[test]
    fn summary_lines_carry_every_selection() {
        let out = build_booking_summary(&summary());
        let text = out.lines.join("\n");
        assert!(text.contains("SUV"));
        assert!(text.contains("Εξωτερικό πλύσιμο"));
        assert!(text.contains("8.00 €"));
        assert!(text.contains("Sparkle Wash"));
        assert!(text.contains("Main St 1, Athens"));
        assert!(text.contains("2025-06-01 at 14:30"));
        assert!(text.contains("saved to your booking history"));
    }

    #[test]
    fn unsaved_booking_says_so() {
        let mut s = summary();
        s.saved_to_history = false;
        let out = build_booking_summary(&s);
        assert!(out.lines.join("\n").contains("not saved to history"));
    }
}
