use std::{collections::HashMap, fmt, hash::Hash};

use super::error::SymbolMapError;

// SymbolMap
/// Two-way map between a closed set of local symbols and their wire tokens.
///
/// The pair set is fixed at construction and unique in both directions. A
/// value round-trips in either direction iff it was registered. Inbound
/// tokens are untrusted wire data: an unregistered token resolves to the
/// map's distinguished `unknown` symbol rather than erroring. Outbound
/// lookups on an unregistered symbol are an error.
#[derive(Clone)]
pub struct SymbolMap<S> {
    symbol_to_token: HashMap<S, &'static str>,
    token_to_symbol: HashMap<&'static str, S>,
    unknown: S,
}

impl<S: Copy + Eq + Hash + fmt::Debug> SymbolMap<S> {
    pub fn new(unknown: S, pairs: &[(S, &'static str)]) -> Result<Self, SymbolMapError> {
        let mut symbol_to_token = HashMap::with_capacity(pairs.len());
        let mut token_to_symbol = HashMap::with_capacity(pairs.len());

        for (symbol, token) in pairs {
            if *symbol == unknown {
                return Err(SymbolMapError::UnknownRegistered);
            }
            if symbol_to_token.insert(*symbol, *token).is_some() {
                return Err(SymbolMapError::DuplicateSymbol {
                    symbol: format!("{symbol:?}"),
                });
            }
            if token_to_symbol.insert(*token, *symbol).is_some() {
                return Err(SymbolMapError::DuplicateToken { token });
            }
        }

        Ok(Self {
            symbol_to_token,
            token_to_symbol,
            unknown,
        })
    }

    /// The wire token for a registered symbol.
    pub fn to_wire(&self, symbol: S) -> Result<&'static str, SymbolMapError> {
        self.symbol_to_token
            .get(&symbol)
            .copied()
            .ok_or(SymbolMapError::UnmappedSymbol {
                symbol: format!("{symbol:?}"),
            })
    }

    /// The local symbol for a wire token; unregistered tokens degrade to
    /// the unknown sentinel.
    pub fn to_symbol(&self, token: &str) -> S {
        self.token_to_symbol
            .get(token)
            .copied()
            .unwrap_or(self.unknown)
    }

    pub fn contains(&self, symbol: S) -> bool {
        self.symbol_to_token.contains_key(&symbol)
    }

    pub fn unknown(&self) -> S {
        self.unknown
    }

    pub fn len(&self) -> usize {
        self.symbol_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_to_token.is_empty()
    }
}
