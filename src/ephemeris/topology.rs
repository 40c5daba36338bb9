//! Body topology: how a named body's position is assembled from segments.
//!
//! A [`Topology`] maps a body name to a signed list of segment identities. The
//! position of the body is the signed sum of the positions of those segments
//! evaluated at the same time. The table carries all the astronomical knowledge;
//! the compositor only executes it.
//!
//! # Text form
//! Each body is described by one line `name = term (+|-) term ...` where a term
//! is a segment `(center,target)`. A leading sign on the first term is allowed,
//! `#` starts a comment:
//!
//! ```text
//! # geocentric Moon
//! moon = (3,301) - (3,399)
//! mars = (0,4) - (3,399) - (0,3)
//! ```
//!
//! The same expression strings are used when a topology is (de)serialized with
//! serde, as a map from body name to expression.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use nom::{
    branch::alt,
    character::complete::{char, i32 as parse_i32, space0},
    combinator::{opt, value},
    multi::many0,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::{
    ephemeris::segment_id::SegmentId,
    numeph_errors::{NumephError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn factor(self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }
}

/// One term of a topology expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedSegment {
    pub sign: Sign,
    pub segment: SegmentId,
}

impl SignedSegment {
    pub fn plus(center: i32, target: i32) -> Self {
        SignedSegment {
            sign: Sign::Plus,
            segment: SegmentId::new(center, target),
        }
    }

    pub fn minus(center: i32, target: i32) -> Self {
        SignedSegment {
            sign: Sign::Minus,
            segment: SegmentId::new(center, target),
        }
    }
}

/// Body name → signed segment terms. Names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Topology {
    bodies: BTreeMap<String, Vec<SignedSegment>>,
}

/// Barycenters of the planetary systems, centered on the solar system barycenter.
const GEOCENTRIC_BARYCENTERS: [(&str, i32); 9] = [
    ("mercury", 1),
    ("venus", 2),
    ("mars", 4),
    ("jupiter", 5),
    ("saturn", 6),
    ("uranus", 7),
    ("neptune", 8),
    ("pluto", 9),
    ("sun", 10),
];

const SSB: i32 = 0;
const EARTH_MOON_BARYCENTER: i32 = 3;
const MOON: i32 = 301;
const EARTH: i32 = 399;

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geocentric positions from a DE kernel restricted to the barycentric chain.
    ///
    /// * planets, Pluto and the Sun: `(0,B) - (3,399) - (0,3)`
    /// * Moon: `(3,301) - (3,399)`
    ///
    /// The referenced segments are listed by [`Self::required_segments`].
    pub fn geocentric() -> Self {
        let mut topology = GEOCENTRIC_BARYCENTERS
            .iter()
            .fold(Topology::new(), |topology, &(name, body)| {
                topology.with_body(
                    name,
                    vec![
                        SignedSegment::plus(SSB, body),
                        SignedSegment::minus(EARTH_MOON_BARYCENTER, EARTH),
                        SignedSegment::minus(SSB, EARTH_MOON_BARYCENTER),
                    ],
                )
            });
        topology.insert(
            "moon",
            vec![
                SignedSegment::plus(EARTH_MOON_BARYCENTER, MOON),
                SignedSegment::minus(EARTH_MOON_BARYCENTER, EARTH),
            ],
        );
        topology
    }

    pub fn with_body(mut self, name: &str, terms: Vec<SignedSegment>) -> Self {
        self.insert(name, terms);
        self
    }

    /// Add or replace a body entry.
    pub fn insert(&mut self, name: &str, terms: Vec<SignedSegment>) {
        self.bodies.insert(name.trim().to_ascii_lowercase(), terms);
    }

    /// Terms of a body, [`NumephError::UnknownBody`] if absent.
    pub fn get(&self, name: &str) -> Result<&[SignedSegment]> {
        self.bodies
            .get(&name.trim().to_ascii_lowercase())
            .map(Vec::as_slice)
            .ok_or_else(|| NumephError::UnknownBody(name.to_string()))
    }

    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    /// Every segment referenced by at least one body.
    pub fn required_segments(&self) -> BTreeSet<SegmentId> {
        self.bodies
            .values()
            .flatten()
            .map(|term| term.segment)
            .collect()
    }

    /// Parse a multi-line topology description (see the module documentation).
    pub fn parse(text: &str) -> Result<Self> {
        text.lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.split('#').next().unwrap_or_default().trim()))
            .filter(|(_, line)| !line.is_empty())
            .try_fold(Topology::new(), |topology, (line_number, line)| {
                let (name, expression) = line.split_once('=').ok_or_else(|| {
                    NumephError::TopologyParse(format!("line {line_number}: missing '=' in '{line}'"))
                })?;
                if name.trim().is_empty() {
                    return Err(NumephError::TopologyParse(format!(
                        "line {line_number}: missing body name"
                    )));
                }
                let terms = parse_expression(expression).map_err(|err| match err {
                    NumephError::TopologyParse(msg) => {
                        NumephError::TopologyParse(format!("line {line_number}: {msg}"))
                    }
                    other => other,
                })?;
                Ok(topology.with_body(name, terms))
            })
    }
}

/// Parse a signed sum of segments, for example `(0,4) - (3,399) - (0,3)`.
pub fn parse_expression(expression: &str) -> Result<Vec<SignedSegment>> {
    match expression_parser(expression) {
        Ok((rest, terms)) if rest.trim().is_empty() => Ok(terms),
        Ok((rest, _)) => Err(NumephError::TopologyParse(format!(
            "unexpected trailing input '{}' in '{}'",
            rest.trim(),
            expression.trim()
        ))),
        Err(err) => Err(NumephError::TopologyParse(format!(
            "invalid expression '{}': {err}",
            expression.trim()
        ))),
    }
}

/// Render terms back into the expression syntax accepted by [`parse_expression`].
pub fn format_expression(terms: &[SignedSegment]) -> String {
    terms
        .iter()
        .enumerate()
        .map(|(i, term)| match (i, term.sign) {
            (0, Sign::Plus) => term.segment.to_string(),
            (0, Sign::Minus) => format!("-{}", term.segment),
            (_, Sign::Plus) => format!(" + {}", term.segment),
            (_, Sign::Minus) => format!(" - {}", term.segment),
        })
        .collect()
}

fn sign_parser(input: &str) -> IResult<&str, Sign> {
    alt((value(Sign::Plus, char('+')), value(Sign::Minus, char('-')))).parse(input)
}

fn segment_parser(input: &str) -> IResult<&str, SegmentId> {
    let (input, (_, _, _, center, _, _, _, target, _, _)) = (
        space0,
        char('('),
        space0,
        parse_i32,
        space0,
        char(','),
        space0,
        parse_i32,
        space0,
        char(')'),
    )
        .parse(input)?;
    Ok((input, SegmentId::new(center, target)))
}

fn expression_parser(input: &str) -> IResult<&str, Vec<SignedSegment>> {
    let (input, (_, first_sign, first)) = (space0, opt(sign_parser), segment_parser).parse(input)?;
    let (input, others) = many0((space0, sign_parser, segment_parser)).parse(input)?;

    let terms = std::iter::once(SignedSegment {
        sign: first_sign.unwrap_or(Sign::Plus),
        segment: first,
    })
    .chain(
        others
            .into_iter()
            .map(|(_, sign, segment)| SignedSegment { sign, segment }),
    )
    .collect();
    Ok((input, terms))
}

impl TryFrom<BTreeMap<String, String>> for Topology {
    type Error = NumephError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self> {
        entries
            .iter()
            .try_fold(Topology::new(), |topology, (name, expression)| {
                Ok(topology.with_body(name, parse_expression(expression)?))
            })
    }
}

impl From<Topology> for BTreeMap<String, String> {
    fn from(topology: Topology) -> Self {
        topology
            .bodies
            .iter()
            .map(|(name, terms)| (name.clone(), format_expression(terms)))
            .collect()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, terms) in &self.bodies {
            writeln!(f, "{name} = {}", format_expression(terms))?;
        }
        Ok(())
    }
}
