//! Netlist parser implementation.

use super::*;
use crate::core::{GenError, GenResult};
use hashbrown::HashMap;

pub fn parse_netlist(text: &str) -> GenResult<Netlist> {
    let parser = Parser::new(text);
    parser.parse()
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,

    // Signals usable as operands so far, with their widths.
    defined: HashMap<&'a str, u32>,
    // Output ports awaiting their assignment.
    outputs: HashMap<&'a str, u32>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            defined: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    fn parse(mut self) -> GenResult<Netlist> {
        self.expect_keyword("module")?;
        let name = self.read_identifier()?.to_string();
        let ports = self.parse_ports()?;

        let mut signals = Vec::new();
        loop {
            let keyword = self.read_identifier()?;
            match keyword {
                "wire" => signals.push(self.parse_wire()?),
                "assign" => signals.push(self.parse_assign()?),
                "endmodule" => break,
                other => return Err(self.error(format!("Unexpected keyword '{}'", other))),
            }
        }

        if let Some(name) = self.outputs.keys().next() {
            return Err(self.error(format!("Output '{}' is never assigned", name)));
        }

        self.skip_whitespace();
        if !self.is_eof() {
            return Err(self.error("Trailing text after endmodule".to_string()));
        }

        Ok(Netlist {
            name,
            ports,
            signals,
        })
    }

    fn error(&self, reason: String) -> GenError {
        GenError::Parse {
            pos: self.pos,
            reason,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            let rest = &self.text[self.pos..];
            if rest.starts_with("//") {
                // Skip comment line
                match rest.find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.text.len(),
                }
            } else if let Some(ch) = self.current_char().filter(|ch| ch.is_whitespace()) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.current_char()
    }

    fn try_read(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> GenResult<()> {
        if !self.try_read(ch) {
            return Err(self.error(format!(
                "Expected '{}' but found {:?}",
                ch,
                self.current_char()
            )));
        }
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: &str) -> GenResult<()> {
        let found = self.read_identifier()?;
        if found != keyword {
            return Err(self.error(format!("Expected '{}' but found '{}'", keyword, found)));
        }
        Ok(())
    }

    fn read_identifier(&mut self) -> GenResult<&'a str> {
        self.skip_whitespace();
        let start = self.pos;

        match self.current_char() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {}
            Some(ch) => return Err(self.error(format!("Expected identifier but found '{}'", ch))),
            None => return Err(self.error("Expected identifier but found EOF".to_string())),
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        Ok(&self.text[start..self.pos])
    }

    fn read_digits(&mut self, radix: u32) -> GenResult<u64> {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch.is_digit(radix) || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let digits: String = self.text[start..self.pos]
            .chars()
            .filter(|ch| *ch != '_')
            .collect();
        if digits.is_empty() {
            return Err(self.error("Expected number".to_string()));
        }
        u64::from_str_radix(&digits, radix)
            .map_err(|e| self.error(format!("Failed to parse number: {}", e)))
    }

    fn read_number(&mut self) -> GenResult<u32> {
        self.skip_whitespace();
        let value = self.read_digits(10)?;
        u32::try_from(value).map_err(|_| self.error(format!("Number {} too large", value)))
    }

    /// `[msb:0]`, returning the width.
    fn parse_range(&mut self) -> GenResult<u32> {
        self.expect('[')?;
        let msb = self.read_number()?;
        self.expect(':')?;
        let lsb = self.read_number()?;
        self.expect(']')?;
        if lsb != 0 {
            return Err(self.error(format!("Declared range must end at 0, found {}", lsb)));
        }
        if msb >= 64 {
            return Err(self.error(format!("Width {} exceeds 64 bits", msb + 1)));
        }
        Ok(msb + 1)
    }

    fn parse_ports(&mut self) -> GenResult<Vec<Port>> {
        self.expect('(')?;
        let mut ports = Vec::new();

        while !self.try_read(')') {
            let direction = match self.read_identifier()? {
                "input" => Direction::Input,
                "output" => Direction::Output,
                other => return Err(self.error(format!("Expected port direction, found '{}'", other))),
            };
            let width = self.parse_range()?;
            let name = self.read_identifier()?;

            if self.defined.contains_key(name) || self.outputs.contains_key(name) {
                return Err(self.error(format!("Duplicate port '{}'", name)));
            }
            match direction {
                Direction::Input => self.defined.insert(name, width),
                Direction::Output => self.outputs.insert(name, width),
            };
            ports.push(Port {
                name: name.to_string(),
                direction,
                width,
            });

            if !self.try_read(',') && self.peek() != Some(')') {
                return Err(self.error("Expected ',' or ')' in port list".to_string()));
            }
        }

        self.expect(';')?;
        Ok(ports)
    }

    fn parse_wire(&mut self) -> GenResult<Signal> {
        let width = self.parse_range()?;
        let name = self.read_identifier()?;
        if self.defined.contains_key(name) || self.outputs.contains_key(name) {
            return Err(self.error(format!("Signal '{}' defined twice", name)));
        }
        self.expect('=')?;
        let expr = self.parse_expr()?;
        self.expect(';')?;

        self.defined.insert(name, width);
        Ok(Signal {
            name: name.to_string(),
            width,
            kind: SignalKind::Wire,
            expr,
        })
    }

    fn parse_assign(&mut self) -> GenResult<Signal> {
        let name = self.read_identifier()?;
        let width = match self.outputs.remove(name) {
            Some(width) => width,
            None => return Err(self.error(format!("'{}' is not an unassigned output", name))),
        };
        self.expect('=')?;
        let expr = self.parse_expr()?;
        self.expect(';')?;

        Ok(Signal {
            name: name.to_string(),
            width,
            kind: SignalKind::Assign,
            expr,
        })
    }

    // Precedence, loosest first: `<<`, then `+ -`, then `*`, then unary `-`.
    fn parse_expr(&mut self) -> GenResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            self.skip_whitespace();
            if self.text[self.pos..].starts_with("<<") {
                self.pos += 2;
                let rhs = self.parse_additive()?;
                lhs = binary(BinOp::Shl, lhs, rhs);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn parse_additive(&mut self) -> GenResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some('+') => BinOp::Add,
                Some('-') => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> GenResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while self.try_read('*') {
            let rhs = self.parse_unary()?;
            lhs = binary(BinOp::Mul, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> GenResult<Expr> {
        if self.try_read('-') {
            return Ok(Expr::Neg(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> GenResult<Expr> {
        match self.peek() {
            Some('{') => {
                self.advance();
                self.parse_concat()
            }
            Some(ch) if ch.is_ascii_digit() => self.parse_literal(),
            Some(_) => self.parse_reference(),
            None => Err(self.error("Expected expression but found EOF".to_string())),
        }
    }

    /// After `{`: either `N{items}}` or `items}`.
    fn parse_concat(&mut self) -> GenResult<Expr> {
        let saved_pos = self.pos;
        if matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            let count = self.read_number()?;
            if self.try_read('{') {
                let items = self.parse_items()?;
                self.expect('}')?;
                return Ok(Expr::Replicate { count, items });
            }
            // A plain literal as first concatenation item
            self.pos = saved_pos;
        }
        Ok(Expr::Concat(self.parse_items()?))
    }

    /// Comma separated expressions up to and including the closing `}`.
    fn parse_items(&mut self) -> GenResult<Vec<Expr>> {
        let mut items = vec![self.parse_expr()?];
        while self.try_read(',') {
            items.push(self.parse_expr()?);
        }
        self.expect('}')?;
        Ok(items)
    }

    fn parse_literal(&mut self) -> GenResult<Expr> {
        let number = self.read_number()?;
        if self.current_char() != Some('\'') {
            return Ok(Expr::Literal {
                width: None,
                value: number as u64,
            });
        }
        self.advance();

        let radix = match self.current_char() {
            Some('h') | Some('H') => 16,
            Some('d') | Some('D') => 10,
            Some('b') | Some('B') => 2,
            other => return Err(self.error(format!("Unsupported literal base {:?}", other))),
        };
        self.advance();
        if number == 0 || number > 64 {
            return Err(self.error(format!("Unsupported literal width {}", number)));
        }
        let value = self.read_digits(radix)?;

        Ok(Expr::Literal {
            width: Some(number),
            value,
        })
    }

    fn parse_reference(&mut self) -> GenResult<Expr> {
        let name = self.read_identifier()?;
        let width = match self.defined.get(name) {
            Some(width) => *width,
            None => return Err(self.error(format!("Signal '{}' used before definition", name))),
        };

        if !self.try_read('[') {
            return Ok(Expr::Ref(name.to_string()));
        }
        let msb = self.read_number()?;
        let lsb = if self.try_read(':') {
            self.read_number()?
        } else {
            msb
        };
        self.expect(']')?;

        if msb < lsb || msb >= width {
            return Err(self.error(format!(
                "Select [{}:{}] out of range for '{}' of width {}",
                msb, lsb, name, width
            )));
        }
        Ok(Expr::Select {
            name: name.to_string(),
            msb,
            lsb,
        })
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
