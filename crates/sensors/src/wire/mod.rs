//! 传输编解码
//!
//! 载荷布局：
//! ```text
//! [ magic "OBS" (3) | version u8 | kind tag u8 | record tag u8 | body … ]
//! ```
//!
//! body 为定长小端 bincode 编码的消息结构；解码失败时不会返回部分记录。

pub mod message;

use bincode::Options;
use bytes::{BufMut, Bytes, BytesMut};
use contracts::{CodecError, RecordType, SensorKind, WireRecord};
use tracing::{debug, warn};

pub use message::{
    LocationsMessage, NoiseMessage, ParamsMessage, ReadingsMessage, ResultsMessage,
    VoxelisationMessage,
};

pub const MAGIC: [u8; 3] = *b"OBS";
pub const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 6;

/// Largest body accepted by the decoder
pub const MAX_BODY_BYTES: u64 = 1 << 30;

/// Envelope header identifying the record a payload carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: SensorKind,
    pub record: RecordType,
}

impl Header {
    pub fn of<R: WireRecord>() -> Self {
        Self {
            kind: R::KIND,
            record: R::RECORD,
        }
    }

    /// Read the header without touching the body
    pub fn parse(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                needed: HEADER_LEN,
                available: payload.len(),
            });
        }
        if payload[..3] != MAGIC {
            return Err(CodecError::BadMagic);
        }
        if payload[3] != VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: payload[3],
                expected: VERSION,
            });
        }

        let kind = SensorKind::from_tag(payload[4]).ok_or(CodecError::UnknownKind(payload[4]))?;
        let record =
            RecordType::from_tag(payload[5]).ok_or(CodecError::UnknownRecord(payload[5]))?;
        Ok(Self { kind, record })
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_slice(&MAGIC);
        buf.put_u8(VERSION);
        buf.put_u8(self.kind.tag());
        buf.put_u8(self.record.tag());
    }
}

fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_BODY_BYTES)
        .reject_trailing_bytes()
}

/// Encode a record into a self-describing payload
pub fn encode<R: WireRecord>(record: &R) -> Result<Bytes, CodecError> {
    let encode_error = |e: bincode::Error| CodecError::Encode {
        kind: R::KIND,
        record: R::RECORD,
        message: e.to_string(),
    };

    let message = record.to_message();
    let body_len = body_options()
        .serialized_size(&message)
        .map_err(encode_error)?;

    let mut buf = BytesMut::with_capacity(HEADER_LEN + body_len as usize);
    Header::of::<R>().put(&mut buf);
    body_options()
        .serialize_into((&mut buf).writer(), &message)
        .map_err(encode_error)?;

    let payload = buf.freeze();
    debug!(
        kind = %R::KIND,
        record = %R::RECORD,
        bytes = payload.len(),
        "record encoded"
    );
    observability::record_encoded(R::KIND, R::RECORD, payload.len());
    Ok(payload)
}

/// Decode a payload into the record type the caller expects
pub fn decode<R: WireRecord>(payload: &[u8]) -> Result<R, CodecError> {
    match decode_record::<R>(payload) {
        Ok(record) => {
            observability::record_decoded(R::KIND, R::RECORD);
            Ok(record)
        }
        Err(e) => {
            warn!(
                kind = %R::KIND,
                record = %R::RECORD,
                bytes = payload.len(),
                reason = e.reason(),
                error = %e,
                "payload rejected"
            );
            observability::record_decode_error(R::KIND, &e);
            Err(e)
        }
    }
}

fn decode_record<R: WireRecord>(payload: &[u8]) -> Result<R, CodecError> {
    let header = Header::parse(payload)?;
    if header.kind != R::KIND {
        return Err(CodecError::KindMismatch {
            expected: R::KIND,
            found: header.kind,
        });
    }
    if header.record != R::RECORD {
        return Err(CodecError::RecordMismatch {
            kind: R::KIND,
            expected: R::RECORD,
            found: header.record,
        });
    }

    let message: R::Message = body_options()
        .deserialize(&payload[HEADER_LEN..])
        .map_err(|e| match *e {
            bincode::ErrorKind::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                CodecError::TruncatedBody {
                    kind: R::KIND,
                    record: R::RECORD,
                }
            }
            other => CodecError::Malformed {
                kind: R::KIND,
                record: R::RECORD,
                message: other.to_string(),
            },
        })?;

    R::from_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::gravity::{GravityParams, GravityResults, GravitySpec};
    use crate::kinds::magnetism::{MagnetismParams, MagnetismSpec};
    use crate::kinds::thermal::{ThermalResults, ThermalSpec};
    use contracts::{NoiseSpec, Vector3, Voxelisation};

    fn gravity_spec() -> GravitySpec {
        GravitySpec {
            locations: vec![Vector3::new(10.0, 20.0, 0.0), Vector3::new(30.0, 40.0, -1.5)],
            voxelisation: Voxelisation {
                x_resolution: 4,
                y_resolution: 4,
                z_resolution: 8,
                supersample: 2,
            },
            noise: NoiseSpec {
                inverse_gamma_alpha: 1.0,
                inverse_gamma_beta: 0.25,
            },
        }
    }

    #[test]
    fn test_header_layout() {
        let payload = encode(&GravityParams {
            return_sensor_data: true,
        })
        .unwrap();
        assert_eq!(&payload[..3], b"OBS");
        assert_eq!(payload[3], VERSION);
        assert_eq!(payload[4], SensorKind::Gravity.tag());
        assert_eq!(payload[5], RecordType::Params.tag());
        assert_eq!(payload.len(), HEADER_LEN + 1);
        assert_eq!(
            Header::parse(&payload).unwrap(),
            Header {
                kind: SensorKind::Gravity,
                record: RecordType::Params
            }
        );
    }

    #[test]
    fn test_spec_round_trip() {
        let spec = gravity_spec();
        let payload = encode(&spec).unwrap();
        assert_eq!(decode::<GravitySpec>(&payload).unwrap(), spec);
    }

    #[test]
    fn test_zero_values_round_trip() {
        let payload = encode(&ThermalSpec::default()).unwrap();
        assert_eq!(decode::<ThermalSpec>(&payload).unwrap(), ThermalSpec::default());

        let payload = encode(&GravityResults::default()).unwrap();
        let back = decode::<GravityResults>(&payload).unwrap();
        assert_eq!(back.readings, None);
        assert_eq!(back.likelihood, 0.0);
    }

    #[test]
    fn test_empty_readings_differ_from_absent() {
        let empty = ThermalResults {
            readings: Some(vec![]),
            likelihood: 0.0,
        };
        let payload = encode(&empty).unwrap();
        assert_ne!(payload, encode(&ThermalResults::default()).unwrap());
        assert_eq!(decode::<ThermalResults>(&payload).unwrap(), empty);
    }

    #[test]
    fn test_nan_is_bit_exact() {
        let nan = f64::from_bits(0x7ff8_0000_dead_beef);
        let results = GravityResults {
            readings: Some(vec![nan, -0.0, f64::INFINITY]),
            likelihood: nan,
        };
        let back = decode::<GravityResults>(&encode(&results).unwrap()).unwrap();
        let readings = back.readings.unwrap();
        assert_eq!(readings[0].to_bits(), nan.to_bits());
        assert_eq!(readings[1].to_bits(), (-0.0f64).to_bits());
        assert_eq!(back.likelihood.to_bits(), nan.to_bits());
    }

    #[test]
    fn test_truncated_header() {
        let payload = encode(&gravity_spec()).unwrap();
        assert_eq!(
            decode::<GravitySpec>(&payload[..4]).unwrap_err(),
            CodecError::Truncated {
                needed: HEADER_LEN,
                available: 4
            }
        );
    }

    #[test]
    fn test_truncated_body() {
        let payload = encode(&gravity_spec()).unwrap();
        for cut in [HEADER_LEN, HEADER_LEN + 5, payload.len() - 1] {
            let err = decode::<GravitySpec>(&payload[..cut]).unwrap_err();
            assert_eq!(err.reason(), "truncated", "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut payload = encode(&gravity_spec()).unwrap().to_vec();
        payload.push(0);
        let err = decode::<GravitySpec>(&payload).unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut payload = encode(&gravity_spec()).unwrap().to_vec();
        payload[3] = VERSION + 1;
        assert!(matches!(
            decode::<GravitySpec>(&payload),
            Err(CodecError::UnsupportedVersion { .. })
        ));

        payload[0] = b'X';
        assert_eq!(decode::<GravitySpec>(&payload), Err(CodecError::BadMagic));
    }

    #[test]
    fn test_unknown_tags() {
        let mut payload = encode(&gravity_spec()).unwrap().to_vec();
        payload[4] = 9;
        assert_eq!(decode::<GravitySpec>(&payload), Err(CodecError::UnknownKind(9)));

        payload[4] = SensorKind::Gravity.tag();
        payload[5] = 0;
        assert_eq!(decode::<GravitySpec>(&payload), Err(CodecError::UnknownRecord(0)));
    }

    #[test]
    fn test_kind_and_record_mismatch() {
        let payload = encode(&gravity_spec()).unwrap();
        assert_eq!(
            decode::<MagnetismSpec>(&payload),
            Err(CodecError::KindMismatch {
                expected: SensorKind::Magnetism,
                found: SensorKind::Gravity
            })
        );
        assert_eq!(
            decode::<GravityParams>(&payload),
            Err(CodecError::RecordMismatch {
                kind: SensorKind::Gravity,
                expected: RecordType::Params,
                found: RecordType::Spec
            })
        );

        let params = encode(&MagnetismParams::default()).unwrap();
        assert!(decode::<MagnetismParams>(&params).is_ok());
    }

    #[test]
    fn test_declared_count_disagrees_with_data() {
        let spec = gravity_spec();
        let mut payload = encode(&spec).unwrap().to_vec();
        // num_locations is the first u64 of the body
        payload[HEADER_LEN] = 3;
        let err = decode::<GravitySpec>(&payload).unwrap_err();
        assert!(
            matches!(
                err,
                CodecError::CountMismatch {
                    declared: 3,
                    actual: 2,
                    ..
                }
            ),
            "got: {err}"
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_bits() -> impl Strategy<Value = f64> {
            any::<u64>().prop_map(f64::from_bits)
        }

        fn bits(values: &[f64]) -> Vec<u64> {
            values.iter().map(|v| v.to_bits()).collect()
        }

        proptest! {
            /// Property: thermal spec round trips with every float bit pattern preserved
            #[test]
            fn prop_thermal_spec_round_trip(
                coordinates in prop::collection::vec(any_bits(), 0..30).prop_map(|mut v| {
                    v.truncate(v.len() / 3 * 3);
                    v
                }),
                resolutions in any::<[i32; 3]>(),
                supersample in any::<u32>(),
                surface in any_bits(),
                lower in any_bits(),
                heat_flow in any::<bool>(),
            ) {
                let spec = ThermalSpec {
                    locations: coordinates
                        .chunks_exact(3)
                        .map(|c| Vector3::new(c[0], c[1], c[2]))
                        .collect(),
                    voxelisation: Voxelisation {
                        x_resolution: resolutions[0],
                        y_resolution: resolutions[1],
                        z_resolution: resolutions[2],
                        supersample,
                    },
                    noise: NoiseSpec { inverse_gamma_alpha: surface, inverse_gamma_beta: lower },
                    surface_temperature: surface,
                    lower_boundary: lower,
                    lower_boundary_is_heat_flow: heat_flow,
                };
                let back = decode::<ThermalSpec>(&encode(&spec).unwrap()).unwrap();

                let flat: Vec<f64> = back.locations.iter().flat_map(|p| p.to_array()).collect();
                prop_assert_eq!(bits(&flat), bits(&coordinates));
                prop_assert_eq!(back.voxelisation, spec.voxelisation);
                prop_assert_eq!(back.surface_temperature.to_bits(), surface.to_bits());
                prop_assert_eq!(back.lower_boundary.to_bits(), lower.to_bits());
                prop_assert_eq!(back.lower_boundary_is_heat_flow, heat_flow);
            }

            /// Property: results round trip, absent readings stay absent
            #[test]
            fn prop_results_round_trip(
                readings in prop::option::of(prop::collection::vec(any_bits(), 0..50)),
                likelihood in any_bits(),
            ) {
                let results = GravityResults { readings: readings.clone(), likelihood };
                let back = decode::<GravityResults>(&encode(&results).unwrap()).unwrap();

                prop_assert_eq!(back.readings.as_deref().map(bits), readings.as_deref().map(bits));
                prop_assert_eq!(back.likelihood.to_bits(), likelihood.to_bits());
            }

            /// Property: any strict prefix of a payload is rejected
            #[test]
            fn prop_prefix_never_decodes(
                readings in prop::collection::vec(-1e3f64..1e3, 0..20),
                cut in any::<prop::sample::Index>(),
            ) {
                let payload = encode(&GravityResults { readings: Some(readings), likelihood: 1.0 }).unwrap();
                let cut = cut.index(payload.len());
                prop_assert!(decode::<GravityResults>(&payload[..cut]).is_err());
            }
        }
    }
}
