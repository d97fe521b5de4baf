//! Package-subtype heuristics. The stored rows carry no subtype column, so
//! the display layer infers one from whatever the booking payload offers:
//! an explicit label, a destination string, or the price per passenger.
//! Best-effort only; a wrong label is cosmetic and must never drive billing.

use serde::{Deserialize, Serialize};

use sahel_domain::booking::Booking;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageSubtype {
    Umra,
    Can2025,
    Visa,
    General,
}

impl PackageSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageSubtype::Umra => "umra",
            PackageSubtype::Can2025 => "can2025",
            PackageSubtype::Visa => "visa",
            PackageSubtype::General => "general",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "umra" => Some(PackageSubtype::Umra),
            "can2025" => Some(PackageSubtype::Can2025),
            "visa" => Some(PackageSubtype::Visa),
            "general" => Some(PackageSubtype::General),
            _ => None,
        }
    }
}

impl std::str::FromStr for PackageSubtype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageSubtype::from_label(&s.to_lowercase()).ok_or(())
    }
}

impl std::fmt::Display for PackageSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const UMRA_TOKENS: [&str; 6] = ["mecca", "mecque", "medina", "médine", "saudi", "arabie"];
const CAN_TOKENS: [&str; 4] = ["abidjan", "côte", "ivoire", "can"];

// Observed XOF price-per-person bands. They overlap around 1.1M-1.2M; the
// check order below is fixed so umra wins there.
const UMRA_BAND: (i64, i64) = (1_100_000, 1_800_000);
const CAN_BAND: (i64, i64) = (800_000, 1_200_000);
const VISA_BAND: (i64, i64) = (50_000, 300_000);

fn in_band(value: i64, (lo, hi): (i64, i64)) -> bool {
    value >= lo && value <= hi
}

/// Infer the display subtype of a package booking. Total and deterministic:
/// first matching rule wins, nothing matches falls back to `General`.
pub fn classify(booking: &Booking) -> PackageSubtype {
    // 1. Explicit label recorded at sale time, when it is one we know.
    if let Some(subtype) = booking
        .explicit_package_type()
        .and_then(|label| PackageSubtype::from_label(&label.to_lowercase()))
    {
        return subtype;
    }

    // 2. Destination tokens.
    if let Some(destination) = booking.destination() {
        let destination = destination.to_lowercase();
        if UMRA_TOKENS.iter().any(|token| destination.contains(token)) {
            return PackageSubtype::Umra;
        }
        if CAN_TOKENS.iter().any(|token| destination.contains(token)) {
            return PackageSubtype::Can2025;
        }
    }

    // 3. Price per person.
    let price_per_person = booking.total_amount / booking.passenger_count().max(1) as i64;
    if in_band(price_per_person, UMRA_BAND) {
        return PackageSubtype::Umra;
    }
    if in_band(price_per_person, CAN_BAND) {
        return PackageSubtype::Can2025;
    }
    if in_band(price_per_person, VISA_BAND) {
        return PackageSubtype::Visa;
    }

    PackageSubtype::General
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sahel_domain::booking::{BookingStatus, BookingType};
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn package(amount: i64, passenger_details: Option<Value>, flight_details: Option<Value>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            booking_type: BookingType::Package,
            status: BookingStatus::Confirmed,
            guest_email: Some("guest@example.com".to_string()),
            guest_phone: None,
            total_amount: amount,
            commission_amount: None,
            commission_percentage: None,
            passenger_details,
            flight_details,
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn explicit_package_type_wins_over_everything() {
        let booking = package(
            1_500_000, // price band says umra
            Some(json!({"packageType": "visa", "passengers": [{"name": "A"}]})),
            Some(json!({"destination": "Mecca"})),
        );
        assert_eq!(classify(&booking), PackageSubtype::Visa);
    }

    #[test]
    fn unknown_explicit_label_falls_through() {
        let booking = package(
            100_000,
            Some(json!({"packageType": "cruise"})),
            Some(json!({"destination": "Abidjan"})),
        );
        assert_eq!(classify(&booking), PackageSubtype::Can2025);
    }

    #[test]
    fn destination_tokens_map_to_subtypes() {
        for dest in ["Mecque via Jeddah", "MEDINA", "Arabie Saoudite"] {
            let booking = package(0, None, Some(json!({"destination": dest})));
            assert_eq!(classify(&booking), PackageSubtype::Umra, "{dest}");
        }
        for dest in ["Abidjan", "Côte d'Ivoire", "CAN stadium package"] {
            let booking = package(0, None, Some(json!({"destination": dest})));
            assert_eq!(classify(&booking), PackageSubtype::Can2025, "{dest}");
        }
    }

    #[test]
    fn price_bands_classify_per_person() {
        // 2 passengers at 1.4M each.
        let booking = package(2_800_000, Some(json!({"passengers": [{}, {}]})), None);
        assert_eq!(classify(&booking), PackageSubtype::Umra);

        let booking = package(900_000, None, None);
        assert_eq!(classify(&booking), PackageSubtype::Can2025);

        let booking = package(150_000, None, None);
        assert_eq!(classify(&booking), PackageSubtype::Visa);
    }

    #[test]
    fn overlapping_bands_resolve_to_umra() {
        // 1.15M sits in both the umra and can2025 bands; umra is checked first.
        let booking = package(1_150_000, None, None);
        assert_eq!(classify(&booking), PackageSubtype::Umra);
    }

    #[test]
    fn missing_passenger_list_counts_as_one_traveller() {
        let booking = package(1_200_000, None, None);
        assert_eq!(classify(&booking), PackageSubtype::Umra);
    }

    #[test]
    fn out_of_band_prices_degrade_to_general() {
        for amount in [0, 49_999, 300_001, 799_999, 5_000_000] {
            let booking = package(amount, None, None);
            assert_eq!(classify(&booking), PackageSubtype::General, "{amount}");
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let booking = package(1_150_000, None, Some(json!({"destination": "somewhere"})));
        let first = classify(&booking);
        for _ in 0..10 {
            assert_eq!(classify(&booking), first);
        }
    }
}
