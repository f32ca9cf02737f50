//! Tableau Core Types and Definitions
//!
//! This crate provides the foundational types used by Tableau scenes. It
//! includes:
//!
//! - **Identifiers**: Interned figure identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling and the presentation palette ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and placements ([`geometry`] module)
//! - **Curves**: Smooth curves through control points ([`curve::SmoothCurve`])
//! - **Draw**: Figures and their SVG rendering ([`draw`] module)

pub mod color;
pub mod curve;
pub mod draw;
pub mod geometry;
pub mod identifier;
