//! Cipher-state activation on change-cipher-spec.

use std::fmt;
use std::ops::Deref;

use zeroize::Zeroizing;

use crate::connection::ConnectionState;
use crate::Error;

/// Which half of the negotiated key block to install.
///
/// Each peer activates the read side keyed from the other peer's write keys,
/// so a server installs `ServerRead` (client write keys) and a client
/// installs `ClientRead` (server write keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherDirection {
    ClientRead,
    ServerRead,
}

impl CipherDirection {
    pub fn read_for(is_server: bool) -> Self {
        if is_server {
            CipherDirection::ServerRead
        } else {
            CipherDirection::ClientRead
        }
    }
}

/// Key material derived from the master secret. Wiped on drop.
#[derive(Clone, Default)]
pub struct KeyBlock(Zeroizing<Vec<u8>>);

impl KeyBlock {
    pub fn new(material: Vec<u8>) -> Self {
        KeyBlock(Zeroizing::new(material))
    }
}

impl Deref for KeyBlock {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for KeyBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyBlock(len: {})", self.0.len())
    }
}

/// Key derivation and cipher installation, provided by the handshake.
///
/// Both operations are atomic from our point of view: either they succeed,
/// or they fail and have already recorded whatever detail they need to.
pub trait KeySchedule {
    /// Derive the key block from the session master secret.
    fn derive_key_block(&mut self, state: &ConnectionState) -> Result<KeyBlock, Error>;

    /// Install the cipher state for one direction.
    fn install_cipher_state(
        &mut self,
        state: &ConnectionState,
        direction: CipherDirection,
    ) -> Result<(), Error>;
}

/// Activate the pending cipher state after a change-cipher-spec.
///
/// The first activation derives the key block, which requires a session with
/// a master secret. Later activations reuse it. Installing the same direction
/// twice in one epoch is not detected here.
pub fn activate(
    state: &mut ConnectionState,
    keys: &mut dyn KeySchedule,
    is_server: bool,
) -> Result<(), Error> {
    let direction = CipherDirection::read_for(is_server);

    if state.pending_key_block.is_none() {
        let Some(session) = state.session.as_mut().filter(|s| s.has_master_secret()) else {
            // Can happen if a CCS overtakes the key exchange, or arrives
            // during renegotiation before keys are computed.
            debug!("Change cipher spec before key material");
            return Err(Error::CcsReceivedEarly);
        };

        session.cipher_suite = state.new_cipher_suite;

        let key_block = keys.derive_key_block(state)?;
        trace!("Derived {:?}", key_block);
        state.pending_key_block = Some(key_block);
    }

    keys.install_cipher_state(state, direction)?;
    debug!("Activated cipher state {:?}", direction);

    Ok(())
}
