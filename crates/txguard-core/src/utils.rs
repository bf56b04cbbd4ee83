/*!
 * TxGuard Utils
 *
 * Conversão de unidades, validação de endereços e codificação de calldata ERC20
 */

use ethereum_types::{Address, U256};
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Error, Result};

/// Seletor de `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Seletor de `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Seletor de `Error(string)` usado em dados de revert
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    Address::from_str(hex_str).ok()
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}

/// Formata um endereço com checksum EIP-55
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Verifica se uma string é um endereço válido.
///
/// Exige prefixo `0x` e 40 dígitos hexadecimais. Endereços com letras
/// maiúsculas e minúsculas misturadas precisam bater com o checksum EIP-55.
pub fn is_valid_address(input: &str) -> bool {
    let Some(hex_part) = input.strip_prefix("0x") else {
        return false;
    };
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    match Address::from_str(hex_part) {
        Ok(address) => to_checksum(&address) == input,
        Err(_) => false,
    }
}

/// Converte um valor legível (ex.: "50.00") para unidades base.
///
/// Aceita apenas dígitos ASCII com no máximo um ponto decimal e no máximo
/// `decimals` casas fracionárias. Sinais, expoentes e excesso de precisão
/// são rejeitados.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = || Error::InvalidAmount(format!("'{}' não é um valor válido", amount));
    if decimals > MAX_DECIMALS {
        return Err(Error::InvalidAmount(format!(
            "{} casas decimais excedem o máximo de {}",
            decimals, MAX_DECIMALS
        )));
    }

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidAmount(format!(
            "'{}' excede {} casas decimais",
            amount, decimals
        )));
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(integer);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| invalid())
}

/// Maior precisão cujo fator 10^decimals ainda cabe em um U256
pub const MAX_DECIMALS: u8 = 77;

/// Formata um valor com decimais para exibição
pub fn format_token_amount(amount: &U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    // 10^decimals acima de U256::MAX: todo valor cabe na parte fracionária
    let (integer_part, fractional_part) = match U256::from(10).checked_pow(U256::from(decimals)) {
        Some(divisor) => (amount / divisor, amount % divisor),
        None => (U256::zero(), *amount),
    };

    // Parte fracionária com zeros à esquerda
    let fractional_str = fractional_part.to_string();
    let padding = decimals as usize - fractional_str.len();
    let mut padded_fractional = String::with_capacity(decimals as usize);
    for _ in 0..padding {
        padded_fractional.push('0');
    }
    padded_fractional.push_str(&fractional_str);

    // Remove zeros à direita
    while padded_fractional.ends_with('0') {
        padded_fractional.pop();
    }

    if padded_fractional.is_empty() {
        integer_part.to_string()
    } else {
        format!("{}.{}", integer_part, padded_fractional)
    }
}

fn encode_address_word(buffer: &mut Vec<u8>, address: &Address) {
    buffer.extend_from_slice(&[0u8; 12]);
    buffer.extend_from_slice(address.as_bytes());
}

fn encode_u256_word(buffer: &mut Vec<u8>, value: &U256) {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    buffer.extend_from_slice(&word);
}

/// Calldata de `transfer(recipient, amount)`
pub fn encode_transfer(recipient: &Address, amount: &U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(68); // seletor + endereço + valor
    data.extend_from_slice(&TRANSFER_SELECTOR);
    encode_address_word(&mut data, recipient);
    encode_u256_word(&mut data, amount);
    data
}

/// Calldata de `balanceOf(owner)`
pub fn encode_balance_of(owner: &Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    encode_address_word(&mut data, owner);
    data
}

/// Decodifica o primeiro word de um retorno ABI como U256
pub fn decode_u256(output: &[u8]) -> Result<U256> {
    if output.len() < 32 {
        return Err(Error::DecodeError(format!(
            "retorno com {} bytes, esperado ao menos 32",
            output.len()
        )));
    }
    Ok(U256::from_big_endian(&output[0..32]))
}

/// Extrai a mensagem de dados de revert no formato `Error(string)`
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 + 64 || data[0..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    let body = &data[4..];
    let offset = U256::from_big_endian(&body[0..32]);
    if offset > U256::from(body.len()) {
        return None;
    }
    let offset = offset.as_usize();
    if body.len() < offset + 32 {
        return None;
    }
    let len = U256::from_big_endian(&body[offset..offset + 32]);
    if len > U256::from(body.len()) {
        return None;
    }
    let len = len.as_usize();
    let start = offset + 32;
    let bytes = body.get(start..start + len)?;
    String::from_utf8(bytes.to_vec()).ok()
}
