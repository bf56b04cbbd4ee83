/*! txguard-preflight
 *
 * Avaliação de preflight de transferências ERC20: antes da assinatura,
 * verifica saldos, simula a chamada e estima o gas, agregando tudo em um
 * veredito com problemas ordenados por verificação.
 */

mod checks;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod guard;
pub mod resolver;
pub mod sequencer;
pub mod stats;

pub use config::*;
pub use errors::*;
pub use evaluator::*;
pub use guard::*;
pub use resolver::*;
pub use sequencer::*;
pub use stats::*;
