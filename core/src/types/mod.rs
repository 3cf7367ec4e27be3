//! Core type definitions for ECG conversion
//!
//! This module provides the fundamental types used throughout the ecgdicom library:
//! - [`Lead`]: The 12 standard leads in canonical channel order
//! - [`WaveformKind`] and [`WaveformSet`]: Decoded rhythm and median waveforms
//! - [`EcgMetadata`]: Patient, timing and measurement fields of a record
//! - [`AnnotationRules`]: Coding table for measurement annotations
//! - [`ConverterConfig`]: Run-wide converter settings

mod annotation;
mod config;
mod lead;
mod metadata;
mod waveform;

pub use annotation::{AnnotationRule, AnnotationRules};
pub use config::ConverterConfig;
pub use lead::{Lead, CANONICAL_LEADS, DERIVED_LEADS};
pub use metadata::{
    DateTimePair, EcgMetadata, EcgRecord, Measurements, PatientInfo, QrsTime, MEASUREMENT_FIELDS,
};
pub use waveform::{LeadFilterInfo, WaveformKind, WaveformSet};
