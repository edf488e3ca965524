use std::fmt;
use std::time::Duration;

use anyhow::Context;
use clap::ArgMatches;
use log::{debug, info};
use ndn_core::security::sign_with_sha256;
use ndn_core::{
    duration_to_millis, Blob, Data, Exclude, Interest, KeyLocator, KeyLocatorType, Name,
    NameComponent, SignedBlob,
};
use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::utils::{format_bytes, parse_hex, read_packet};

/// The fields of an Interest, as printed by `decode-interest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestDump {
    name: String,
    min_suffix_components: Option<u64>,
    max_suffix_components: Option<u64>,
    key_locator: Option<String>,
    exclude: Option<String>,
    child_selector: Option<u64>,
    must_be_fresh: bool,
    nonce: Option<String>,
    scope: Option<u64>,
    #[serde(rename = "lifetimeMilliseconds")]
    lifetime_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDump {
    name: String,
    content: String,
    content_type: String,
    freshness_period_ms: Option<u64>,
    final_block_id: Option<String>,
    signature_type: String,
    key_locator: Option<String>,
    signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDump {
    encoding: String,
    signed_portion: [usize; 2],
}

impl From<&Interest> for InterestDump {
    fn from(interest: &Interest) -> Self {
        let exclude = interest.exclude();
        Self {
            name: interest.name().to_uri(),
            min_suffix_components: interest.min_suffix_components(),
            max_suffix_components: interest.max_suffix_components(),
            key_locator: describe_key_locator(interest.key_locator()),
            exclude: (!exclude.is_empty()).then(|| exclude.to_uri()),
            child_selector: interest.child_selector(),
            must_be_fresh: interest.must_be_fresh(),
            nonce: interest.nonce().map(Blob::to_hex),
            scope: interest.scope(),
            lifetime_ms: interest.interest_lifetime().map(duration_to_millis),
        }
    }
}

impl From<&Data> for DataDump {
    fn from(data: &Data) -> Self {
        let meta_info = data.meta_info();
        let signature = data.signature();
        let content = match std::str::from_utf8(data.content()) {
            Ok(text) => text.to_string(),
            Err(_) => data.content().to_hex(),
        };
        Self {
            name: data.name().to_uri(),
            content,
            content_type: format!("{:?}", meta_info.content_type()),
            freshness_period_ms: meta_info.freshness_period().map(duration_to_millis),
            final_block_id: meta_info.final_block_id().map(NameComponent::to_string),
            signature_type: format!("{:?}", signature.signature_type()),
            key_locator: describe_key_locator(signature.key_locator()),
            signature: signature.signature().map(Blob::to_hex),
        }
    }
}

impl From<&SignedBlob> for EncodingDump {
    fn from(encoding: &SignedBlob) -> Self {
        let signed_portion = encoding.signed_portion();
        Self {
            encoding: encoding.to_hex(),
            signed_portion: [signed_portion.begin, signed_portion.end],
        }
    }
}

fn describe_key_locator(key_locator: &KeyLocator) -> Option<String> {
    match key_locator.locator_type()? {
        KeyLocatorType::KeyName => Some(format!("KeyName: {}", key_locator.key_name())),
        KeyLocatorType::KeyLocatorDigest => key_locator
            .key_digest()
            .map(|digest| format!("KeyLocatorDigest: {}", digest.to_hex())),
    }
}

struct Field<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("<none>"),
        }
    }
}

impl fmt::Display for InterestDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "minSuffixComponents: {}", Field(&self.min_suffix_components))?;
        writeln!(f, "maxSuffixComponents: {}", Field(&self.max_suffix_components))?;
        writeln!(f, "keyLocator: {}", Field(&self.key_locator))?;
        writeln!(f, "exclude: {}", Field(&self.exclude))?;
        writeln!(f, "childSelector: {}", Field(&self.child_selector))?;
        writeln!(f, "mustBeFresh: {}", self.must_be_fresh)?;
        writeln!(f, "nonce: {}", Field(&self.nonce))?;
        writeln!(f, "scope: {}", Field(&self.scope))?;
        write!(f, "lifetimeMilliseconds: {}", Field(&self.lifetime_ms))
    }
}

impl fmt::Display for DataDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "content: {}", self.content)?;
        writeln!(f, "metaInfo.type: {}", self.content_type)?;
        writeln!(f, "metaInfo.freshnessPeriod: {}", Field(&self.freshness_period_ms))?;
        writeln!(f, "metaInfo.finalBlockId: {}", Field(&self.final_block_id))?;
        writeln!(f, "signature.type: {}", self.signature_type)?;
        writeln!(f, "signature.keyLocator: {}", Field(&self.key_locator))?;
        write!(f, "signature.signature: {}", Field(&self.signature))
    }
}

impl fmt::Display for EncodingDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoding)
    }
}

fn render<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn handle_decode_interest(matches: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let packet = read_packet(matches)?;
    let mut interest = Interest::default();
    interest
        .wire_decode(&packet)
        .context("Cannot decode Interest")?;
    info!("Decoded Interest ({})", format_bytes(packet.len() as u64));

    println!("{}", render(&InterestDump::from(&interest), config.output.format)?);
    Ok(())
}

pub fn handle_decode_data(matches: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let packet = read_packet(matches)?;
    let mut data = Data::default();
    data.wire_decode(&packet).context("Cannot decode Data")?;
    info!("Decoded Data ({})", format_bytes(packet.len() as u64));

    println!("{}", render(&DataDump::from(&data), config.output.format)?);
    Ok(())
}

/// Build the Interest described by `encode-interest` arguments, falling back
/// to the `[interest]` configuration.
pub fn build_interest(matches: &ArgMatches, config: &Config) -> anyhow::Result<Interest> {
    let name = matches.get_one::<String>("name").context("No name given")?;
    let mut interest = Interest::new(Name::from_uri(name)?);

    if let Some(entries) = matches.get_one::<String>("exclude") {
        interest.set_exclude(parse_exclude(entries)?);
    }
    let lifetime_ms = match matches.get_one::<String>("lifetime") {
        Some(lifetime) => Some(lifetime.parse::<u64>().context("Invalid lifetime")?),
        None => config.interest.lifetime_ms,
    };
    let scope = match matches.get_one::<String>("scope") {
        Some(scope) => Some(scope.parse::<u64>().context("Invalid scope")?),
        None => None,
    };
    interest
        .set_interest_lifetime(lifetime_ms.map(Duration::from_millis))
        .set_scope(scope)
        .set_must_be_fresh(config.interest.must_be_fresh && !matches.get_flag("no-fresh"));

    // The nonce goes last; any later edit would clear it.
    match matches.get_one::<String>("nonce") {
        Some(nonce) => {
            let nonce = parse_hex(nonce)?;
            interest
                .set_nonce(Some(Blob::from(nonce)))
                .context("Invalid nonce")?;
        }
        None => {
            interest.refresh_nonce();
        }
    }
    Ok(interest)
}

/// Parse Exclude entries in `abc,*` form.
pub fn parse_exclude(entries: &str) -> anyhow::Result<Exclude> {
    let mut exclude = Exclude::new();
    for entry in entries.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        if entry == "*" {
            exclude.append_any();
        } else {
            exclude.append_component(NameComponent::from_escaped_str(entry)?);
        }
    }
    Ok(exclude)
}

pub fn handle_encode_interest(matches: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let interest = build_interest(matches, config)?;
    let encoding = interest.wire_encode()?;
    debug!("Encoded Interest for {} ({})", interest.name(), format_bytes(encoding.len() as u64));

    println!("{}", render(&EncodingDump::from(&encoding), config.output.format)?);
    Ok(())
}

pub fn handle_digest_sign(matches: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let name = matches.get_one::<String>("name").context("No name given")?;
    let content = matches.get_one::<String>("content").context("No content given")?;

    let mut data = Data::new(Name::from_uri(name)?);
    data.set_content(content.as_bytes());
    if let Some(freshness) = matches.get_one::<String>("freshness") {
        let freshness = freshness.parse::<u64>().context("Invalid freshness period")?;
        data.meta_info_mut()
            .set_freshness_period(Some(Duration::from_millis(freshness)));
    }

    let encoding = sign_with_sha256(&mut data)?;
    debug!("Full name {}", data.full_name()?);

    println!("{}", render(&EncodingDump::from(&encoding), config.output.format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndn_core::security::verify_sha256_signature;

    const CODED_INTEREST: &str = "0553 070a08036e646e08036162 63 0938 0d0104 0e0106 0f221d20 \
        000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f \
        1007080361626313 00 110101 1200 0a0461626162 0b0102 0c027530";

    fn decoded_reference() -> Interest {
        let mut interest = Interest::default();
        interest.wire_decode(&parse_hex(CODED_INTEREST).unwrap()).unwrap();
        interest
    }

    #[test]
    fn test_interest_dump_text() {
        let dump = InterestDump::from(&decoded_reference());
        let expected = "name: /ndn/abc\n\
            minSuffixComponents: 4\n\
            maxSuffixComponents: 6\n\
            keyLocator: KeyLocatorDigest: 000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\n\
            exclude: abc,*\n\
            childSelector: 1\n\
            mustBeFresh: true\n\
            nonce: 61626162\n\
            scope: 2\n\
            lifetimeMilliseconds: 30000";
        assert_eq!(dump.to_string(), expected);
    }

    #[test]
    fn test_interest_dump_absent_fields() {
        let mut interest = decoded_reference();
        interest.exclude_mut().clear();
        let text = InterestDump::from(&interest).to_string();
        assert!(text.contains("exclude: <none>"));
        assert!(text.contains("nonce: <none>"));
    }

    #[test]
    fn test_interest_dump_json() {
        let dump = InterestDump::from(&decoded_reference());
        let json: serde_json::Value =
            serde_json::from_str(&render(&dump, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["name"], "/ndn/abc");
        assert_eq!(json["lifetimeMilliseconds"], 30000);
        assert_eq!(json["scope"], 2);
    }

    #[test]
    fn test_oversized_lifetime_saturates() {
        let mut interest = decoded_reference();
        interest.set_interest_lifetime(Some(Duration::MAX));
        let dump = InterestDump::from(&interest);
        assert_eq!(dump.lifetime_ms, Some(u64::MAX));
    }

    #[test]
    fn test_short_nonce_is_rejected() {
        let matches = crate::cli()
            .try_get_matches_from(["ndn", "encode-interest", "/a", "-n", "0102"])
            .unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        let error = build_interest(sub_matches, &Config::default()).unwrap_err();
        assert!(format!("{:#}", error).contains("Invalid nonce"));
    }

    #[test]
    fn test_parse_exclude() {
        let exclude = parse_exclude("abc, *").unwrap();
        assert_eq!(exclude.to_uri(), "abc,*");
        assert!(parse_exclude("%zz").is_err());
    }

    #[test]
    fn test_digest_signed_data_dump() {
        let mut data = Data::new(Name::from_uri("/ndn/abc").unwrap());
        data.set_content(&b"SUCCESS!"[..]);
        let encoding = sign_with_sha256(&mut data).unwrap();

        let mut decoded = Data::default();
        decoded.wire_decode(&encoding).unwrap();
        assert!(verify_sha256_signature(&decoded).unwrap());

        let dump = DataDump::from(&decoded);
        assert_eq!(dump.content, "SUCCESS!");
        assert_eq!(dump.signature_type, "DigestSha256");
        assert_eq!(dump.key_locator, None);
        assert_eq!(dump.signature.map(|s| s.len()), Some(64));
    }

    #[test]
    fn test_encoding_dump() {
        let interest = decoded_reference();
        let dump = EncodingDump::from(&interest.wire_encode().unwrap());
        assert_eq!(dump.signed_portion, [4, 9]);
        assert_eq!(parse_hex(&dump.encoding).unwrap(), parse_hex(CODED_INTEREST).unwrap());
    }
}
