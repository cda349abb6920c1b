//! Versioned opcode tables.
//!
//! Each table maps an identifier lexeme to its single-byte command code.
//! Codes are unique within a table version. The v2 table is banded with
//! gaps reserved per op family; v1 predates the banding and lacks the
//! filter, event and channel families — the additions that forced the
//! reband and broke wire compatibility between the two.

use lumen_wire::ProtocolVersion;

/// Look up an identifier in the pinned table version.
///
/// `None` means the word is not a command in that version; the generator
/// emits nothing for it.
pub fn opcode(word: &str, version: ProtocolVersion) -> Option<u8> {
    match version {
        ProtocolVersion::V1 => v1_opcode(word),
        ProtocolVersion::V2 => v2_opcode(word),
    }
}

/// Current banded table.
fn v2_opcode(word: &str) -> Option<u8> {
    let code = match word {
        // filters 1-30
        "filterNone" => 1,
        "filterBlur" => 2,
        "filterColorShift" => 3,
        "filterMirror" => 4,
        "filterScatter" => 5,
        // drawings 31-36
        "setDrawing" => 31,
        "addDrawing" => 32,
        "subDrawing" => 33,
        "scaDrawing" => 34,
        "filDrawing" => 35,
        // windows 37-41
        "setWindow" => 37,
        "addWindow" => 38,
        "subWindow" => 39,
        "scaWindow" => 40,
        "filWindow" => 41,
        // frame 42, clip 43
        "frame" => 42,
        "clip" => 43,
        // sifters 46-52
        "sifDevices" => 46,
        "siftStrands" => 47,
        "siftGroups" => 48,
        // event handler 53
        "eventHandler" => 53,
        // animations 54-182
        "animNone" => 54,
        "animFill" => 55,
        "animRainbow" => 56,
        "animFade" => 57,
        "animPlasmaShot" => 58,
        "animLoadingBar" => 59,
        "animColorRoll" => 60,
        "animPaletteRoll" => 61,
        "animationDefined" => 63,
        // modifiers 189-206
        "modifyBrightness" => 189,
        "modifyTimeline" => 190,
        "modifyFadeIn" => 191,
        "modifyFadeOut" => 192,
        "modifyColorSwitch" => 193,
        "modifyTimeLoop" => 194,
        "modifyTimeScale" => 195,
        "modifyTimeChange" => 196,
        // variables 207-222
        "device" => 207,
        "strand" => 208,
        "pixels" => 209,
        "port" => 210,
        "group" => 211,
        "mark" => 212,
        "constant" => 213,
        "channel" => 214,
        "event" => 215,
        // definitions 223-230
        "defDevice1" => 223,
        "defDevice2" => 224,
        "defDevice4" => 225,
        "defDevice8" => 226,
        "defStrand" => 227,
        "defGroup" => 228,
        "defMarks" => 229,
        "defAnimation" => 230,
        // events 231-239
        "emitEvent" => 231,
        "onEvent" => 232,
        "setEventParam" => 233,
        // channels 240-250
        "writeChannel" => 240,
        "eventParameterValue" => 241,
        "eventParameterValueSmoothed" => 242,
        "addValues" => 243,
        "subValues" => 244,
        "mulValues" => 245,
        "divValues" => 246,
        "modValues" => 247,
        "scaValue" => 248,
        "mapValue" => 249,
        _ => return None,
    };
    Some(code)
}

/// Original contiguous table.
fn v1_opcode(word: &str) -> Option<u8> {
    let code = match word {
        // drawings 1-5
        "setDrawing" => 1,
        "addDrawing" => 2,
        "subDrawing" => 3,
        "scaDrawing" => 4,
        "filDrawing" => 5,
        // windows 6-10
        "setWindow" => 6,
        "addWindow" => 7,
        "subWindow" => 8,
        "scaWindow" => 9,
        "filWindow" => 10,
        "frame" => 11,
        "clip" => 12,
        // sifters 13-15
        "sifDevices" => 13,
        "siftStrands" => 14,
        "siftGroups" => 15,
        "eventHandler" => 16,
        // animations 20-28
        "animNone" => 20,
        "animFill" => 21,
        "animRainbow" => 22,
        "animFade" => 23,
        "animPlasmaShot" => 24,
        "animLoadingBar" => 25,
        "animColorRoll" => 26,
        "animPaletteRoll" => 27,
        "animationDefined" => 28,
        // modifiers 30-37
        "modifyBrightness" => 30,
        "modifyTimeline" => 31,
        "modifyFadeIn" => 32,
        "modifyFadeOut" => 33,
        "modifyColorSwitch" => 34,
        "modifyTimeLoop" => 35,
        "modifyTimeScale" => 36,
        "modifyTimeChange" => 37,
        // variables 40-46
        "device" => 40,
        "strand" => 41,
        "pixels" => 42,
        "port" => 43,
        "group" => 44,
        "mark" => 45,
        "constant" => 46,
        // definitions 50-57
        "defDevice1" => 50,
        "defDevice2" => 51,
        "defDevice4" => 52,
        "defDevice8" => 53,
        "defStrand" => 54,
        "defGroup" => 55,
        "defMarks" => 56,
        "defAnimation" => 57,
        _ => return None,
    };
    Some(code)
}
