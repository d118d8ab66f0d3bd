//! Record macros
//!
//! Every kind shares the same Params / Results / Prior shapes; these macros stamp
//! them out so a kind module only spells out its Spec and its option handling.

/// Define the Params, Results and Prior records of a sensor kind
///
/// # Usage
/// ```ignore
/// define_run_records!(
///     SensorKind::Gravity,   // kind
///     GravityParams,         // Params record
///     GravityResults,        // Results record
///     GravityPrior           // Prior record
/// );
/// ```
macro_rules! define_run_records {
    (
        $kind:expr,
        $params:ident,
        $results:ident,
        $prior:ident
    ) => {
        /// Per-run knobs
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $params {
            /// Ask the worker to send the simulated readings back
            pub return_sensor_data: bool,
        }

        /// Readings plus the likelihood of the latest evaluation
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $results {
            pub readings: Option<Vec<f64>>,
            pub likelihood: f64,
        }

        /// No free parameters; every draw is the default Params
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $prior;

        impl contracts::SensorResults for $results {
            fn readings(&self) -> Option<&[f64]> {
                self.readings.as_deref()
            }

            fn likelihood(&self) -> f64 {
                self.likelihood
            }
        }

        impl contracts::ParamsPrior for $prior {
            type Params = $params;

            fn dimension(&self) -> usize {
                0
            }

            fn sample(&self) -> $params {
                $params::default()
            }
        }

        impl contracts::WireRecord for $params {
            const KIND: contracts::SensorKind = $kind;
            const RECORD: contracts::RecordType = contracts::RecordType::Params;

            type Message = $crate::wire::ParamsMessage;

            fn to_message(&self) -> Self::Message {
                $crate::wire::ParamsMessage {
                    return_sensor_data: self.return_sensor_data,
                }
            }

            fn from_message(message: Self::Message) -> Result<Self, contracts::CodecError> {
                Ok(Self {
                    return_sensor_data: message.return_sensor_data,
                })
            }
        }

        impl contracts::WireRecord for $results {
            const KIND: contracts::SensorKind = $kind;
            const RECORD: contracts::RecordType = contracts::RecordType::Results;

            type Message = $crate::wire::ResultsMessage;

            fn to_message(&self) -> Self::Message {
                $crate::wire::ResultsMessage::new(self.readings.as_deref(), self.likelihood)
            }

            fn from_message(message: Self::Message) -> Result<Self, contracts::CodecError> {
                let (readings, likelihood) = message.into_parts($kind)?;
                Ok(Self {
                    readings,
                    likelihood,
                })
            }
        }
    };
}

/// Implement `SensorSpec` for a Spec record with `locations`, `voxelisation` and
/// `noise` fields
macro_rules! impl_sensor_spec {
    ($spec:ident) => {
        impl contracts::SensorSpec for $spec {
            fn locations(&self) -> &[contracts::Vector3] {
                &self.locations
            }

            fn voxelisation(&self) -> &contracts::Voxelisation {
                &self.voxelisation
            }

            fn noise(&self) -> &contracts::NoiseSpec {
                &self.noise
            }
        }
    };
}

pub(crate) use define_run_records;
pub(crate) use impl_sensor_spec;
