//! Packed key code tables.
//!
//! Codes are stored already masked with [`CODE_MASK`], since that is the form
//! they are looked up in.

use btpad_core::{KeyAction, KeyCode};

/// Clears the lower nibble of the first byte, which some clone hardware
/// fills with garbage.
pub const CODE_MASK: u16 = 0xf0ff;

/// One entry of a packed code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodeMapping {
    pub code: u16,
    pub action: KeyAction,
    pub key: KeyCode,
}

const fn down(code: u16, key: KeyCode) -> CodeMapping {
    CodeMapping {
        code,
        action: KeyAction::Down,
        key,
    }
}

const fn up(code: u16, key: KeyCode) -> CodeMapping {
    CodeMapping {
        code,
        action: KeyAction::Up,
        key,
    }
}

/// Codes shared by every controller in the family.
pub const BGP100_CODES: [CodeMapping; 22] = [
    down(0xb049, KeyCode::BUTTON_A),
    up(0xf009, KeyCode::BUTTON_A),
    down(0xb04a, KeyCode::BUTTON_B),
    up(0xf00a, KeyCode::BUTTON_B),
    down(0xb048, KeyCode::BUTTON_C),
    up(0xf008, KeyCode::BUTTON_C),
    down(0xb041, KeyCode::BUTTON_X),
    up(0xf001, KeyCode::BUTTON_X),
    down(0xb044, KeyCode::DPAD_LEFT),
    up(0xf004, KeyCode::DPAD_LEFT),
    down(0xb043, KeyCode::DPAD_RIGHT),
    up(0xf003, KeyCode::DPAD_RIGHT),
    down(0xb045, KeyCode::DPAD_UP),
    up(0xf005, KeyCode::DPAD_UP),
    down(0xb042, KeyCode::DPAD_DOWN),
    up(0xf002, KeyCode::DPAD_DOWN),
    down(0xb046, KeyCode::BUTTON_R1),
    up(0xf006, KeyCode::BUTTON_R1),
    down(0xb047, KeyCode::BUTTON_L1),
    up(0xf007, KeyCode::BUTTON_L1),
    down(0xb04b, KeyCode::BUTTON_START),
    up(0xf00b, KeyCode::BUTTON_START),
];

/// Extra buttons on the Phonejoy. The device sends `0xb24e`, `0xb14d` and
/// `0xb34c` style codes; these are their masked forms.
pub const PHONEJOY_EXTRA_CODES: [CodeMapping; 6] = [
    down(0xb04e, KeyCode::BUTTON_R2),
    up(0xf00e, KeyCode::BUTTON_R2),
    down(0xb04d, KeyCode::BUTTON_L2),
    up(0xf00d, KeyCode::BUTTON_L2),
    down(0xb04c, KeyCode::BUTTON_SELECT),
    up(0xf00c, KeyCode::BUTTON_SELECT),
];

const BGP100_TABLES: &[&[CodeMapping]] = &[&BGP100_CODES];
const PHONEJOY_TABLES: &[&[CodeMapping]] = &[&BGP100_CODES, &PHONEJOY_EXTRA_CODES];

/// Controllers speaking the packed 2-byte protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    Bgp100,
    Phonejoy,
    IControlPad,
}

impl Variant {
    /// Driver name used to select this variant.
    #[must_use]
    pub const fn driver_name(self) -> &'static str {
        match self {
            Variant::Bgp100 => "bgp100",
            Variant::Phonejoy => "phonejoy",
            Variant::IControlPad => "icontrolpad",
        }
    }

    /// Tables consulted for this variant, in lookup order.
    #[must_use]
    pub const fn tables(self) -> &'static [&'static [CodeMapping]] {
        match self {
            Variant::Bgp100 => BGP100_TABLES,
            Variant::Phonejoy | Variant::IControlPad => PHONEJOY_TABLES,
        }
    }

    /// Look up an already masked code.
    #[must_use]
    pub fn lookup(self, code: u16) -> Option<CodeMapping> {
        self.tables()
            .iter()
            .flat_map(|table| table.iter())
            .find(|m| m.code == code)
            .copied()
    }

    /// Every key this variant can emit.
    pub fn keys(self) -> impl Iterator<Item = KeyCode> {
        self.tables()
            .iter()
            .flat_map(|table| table.iter())
            .filter(|m| m.action == KeyAction::Down)
            .map(|m| m.key)
    }
}
