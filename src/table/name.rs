use crate::write::ByteWriter;

use super::TableTag;

pub(crate) const TAG: TableTag = TableTag::new(*b"name");

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const ENGLISH_US: u16 = 0x0409;

const STYLE_NAME: &str = "Regular";

/// Naming table: family/style naming on the Windows platform, strings
/// stored UTF-16BE.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/name>
pub(crate) fn build(family_name: &str) -> Vec<u8> {
    let full_name = format!("{} {}", family_name, STYLE_NAME);
    let postscript_name = format!(
        "{}-{}",
        family_name.replace(' ', ""),
        STYLE_NAME
    );

    // (nameID, value), already in ascending nameID order
    let names = [
        (1, family_name.to_owned()),
        (2, STYLE_NAME.to_owned()),
        (3, full_name.clone()),
        (4, full_name),
        (6, postscript_name),
    ];

    let mut w = ByteWriter::new();

    w.write_u16(0); // format
    w.write_u16(names.len() as u16);
    w.write_u16(6 + 12 * names.len() as u16); // stringOffset

    let mut string_data = ByteWriter::new();
    for (name_id, value) in &names {
        let offset = string_data.len();
        for unit in value.encode_utf16() {
            string_data.write_u16(unit);
        }

        w.write_u16(WINDOWS_PLATFORM);
        w.write_u16(UNICODE_BMP_ENCODING);
        w.write_u16(ENGLISH_US);
        w.write_u16(*name_id);
        w.write_u16((string_data.len() - offset) as u16);
        w.write_u16(offset as u16);
    }

    w.write_bytes(&string_data.into_bytes());

    w.into_bytes()
}
