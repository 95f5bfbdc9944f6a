//! ID-card template layout fields.
//!
//! Each field is a pixel offset (or size, for the photo and QR regions) used to
//! place employee data over the front/back template artwork.

use std::fmt;

use serde::Serialize;

/// Largest accepted coordinate or size, in pixels.
pub const MAX_COORDINATE: f64 = 10_000.0;

macro_rules! layout_fields {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A named overlay coordinate on a template.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum LayoutField {
            $($variant),+
        }

        impl LayoutField {
            pub const ALL: &'static [LayoutField] = &[$(LayoutField::$variant),+];

            /// Column / wire name, e.g. `qr_width`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(LayoutField::$variant => $name),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($name => Some(LayoutField::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

layout_fields! {
    PhotoX => "photo_x",
    PhotoY => "photo_y",
    PhotoWidth => "photo_width",
    PhotoHeight => "photo_height",
    NameX => "name_x",
    NameY => "name_y",
    PositionX => "position_x",
    PositionY => "position_y",
    IdNumberX => "id_number_x",
    IdNumberY => "id_number_y",
    SignatureX => "signature_x",
    SignatureY => "signature_y",
    AddressX => "address_x",
    AddressY => "address_y",
    BirthdayX => "birthday_x",
    BirthdayY => "birthday_y",
    SssX => "sss_x",
    SssY => "sss_y",
    PhilhealthX => "philhealth_x",
    PhilhealthY => "philhealth_y",
    PagibigX => "pagibig_x",
    PagibigY => "pagibig_y",
    TinX => "tin_x",
    TinY => "tin_y",
    EmergencyNameX => "emergency_name_x",
    EmergencyNameY => "emergency_name_y",
    EmergencyContactX => "emergency_contact_x",
    EmergencyContactY => "emergency_contact_y",
    EmergencyAddressX => "emergency_address_x",
    EmergencyAddressY => "emergency_address_y",
    QrX => "qr_x",
    QrY => "qr_y",
    QrWidth => "qr_width",
    QrHeight => "qr_height",
}

impl fmt::Display for LayoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a single coordinate value. Returns the message to show for `field` on failure.
pub fn check_coordinate(value: f64) -> Result<f64, &'static str> {
    if !value.is_finite() {
        return Err("must be a finite number");
    }
    if !(0.0..=MAX_COORDINATE).contains(&value) {
        return Err("must be between 0 and 10000");
    }
    Ok(value)
}
