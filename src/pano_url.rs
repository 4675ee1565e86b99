//! Decoder for scraped map-viewer URLs. A panorama URL looks like
//!
//! ```text
//! https://www.google.com/maps/@40.7128,-74.0060,3a,75y,90t/data=!3m6!1e1!3m4!1sAbCdEf123!2e0!7i16384!8i8192
//! ```
//!
//! and carries two things we care about: the coordinate pair after `/@`, and
//! the panorama id between `!1s` and `!2e`. Both tokens may appear anywhere in
//! the line, so each parser is tried at every position until one matches.

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    error::{Error, ErrorKind},
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};

use std::str::FromStr;

/// The fields extracted from a single scraped URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoUrl {
    /// Latitude in decimal degrees, not yet range checked
    pub lat: f64,
    /// Longitude in decimal degrees, not yet range checked
    pub lng: f64,
    /// Panorama id, when the URL has one
    pub pano_id: Option<String>,
}

/// `-?\d+\.\d+`; the decimal point is mandatory.
fn parse_decimal(s: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((opt(char('-')), digit1, char('.'), digit1))),
        str::parse::<f64>,
    )(s)
}

/// `/@{lat},{lng},`
fn parse_coordinates(s: &str) -> IResult<&str, (f64, f64)> {
    preceded(
        tag("/@"),
        terminated(separated_pair(parse_decimal, char(','), parse_decimal), char(',')),
    )(s)
}

/// `!1s{pano_id}!2e`, taking the shortest id.
fn parse_pano_id(s: &str) -> IResult<&str, String> {
    map(delimited(tag("!1s"), take_until("!2e"), tag("!2e")), |id: &str| {
        id.to_owned()
    })(s)
}

/// Runs `parser` at each char boundary of `s` and returns the first output.
fn search<'a, O>(s: &'a str, mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>) -> Option<O> {
    s.char_indices()
        .find_map(|(idx, _)| parser(&s[idx..]).ok().map(|(_rest, out)| out))
}

impl FromStr for PanoUrl {
    type Err = Error<String>;

    /// Fails only when there is no coordinate pair; a missing pano id is
    /// reported as `None`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = search(s, parse_coordinates).ok_or_else(|| Error {
            input: s.to_string(),
            code: ErrorKind::Tag,
        })?;

        Ok(PanoUrl {
            lat,
            lng,
            pano_id: search(s, parse_pano_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url() {
        let s = "https://www.google.com/maps/@40.7127753,-74.0059728,3a,75y,90t/data=!3m6!1e1!3m4!1sCAoSLEFGMVFpcE!2e0!7i16384!8i8192";

        let res: PanoUrl = s.parse().unwrap();

        assert_eq!(
            res,
            PanoUrl {
                lat: 40.7127753,
                lng: -74.0059728,
                pano_id: Some("CAoSLEFGMVFpcE".to_owned()),
            }
        );
    }

    #[test]
    fn url_without_pano_id() {
        let s = "https://www.google.com/maps/@-33.8688,151.2093,17z";

        let res: PanoUrl = s.parse().unwrap();

        assert_eq!(res.lat, -33.8688);
        assert_eq!(res.lng, 151.2093);
        assert_eq!(res.pano_id, None);
    }

    #[test]
    fn shortest_pano_id_wins() {
        let s = "/@1.5,2.5,x!1sfirst!2e0!1ssecond!2e0";

        let res: PanoUrl = s.parse().unwrap();

        assert_eq!(res.pano_id.as_deref(), Some("first"));
    }

    #[test]
    fn integer_coordinates_are_rejected() {
        assert!("https://maps/@40,-74,3a".parse::<PanoUrl>().is_err());
    }

    #[test]
    fn coordinates_need_trailing_comma() {
        assert!("https://maps/@40.1,-74.2".parse::<PanoUrl>().is_err());
    }

    #[test]
    fn first_coordinate_match_is_used() {
        let s = "/@bad,/@1.25,-2.5,3a/@9.0,9.0,";

        let res: PanoUrl = s.parse().unwrap();

        assert_eq!((res.lat, res.lng), (1.25, -2.5));
    }

    #[test]
    fn empty_line_has_no_coordinates() {
        assert!("".parse::<PanoUrl>().is_err());
    }
}
